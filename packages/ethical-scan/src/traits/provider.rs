//! The uniform provider capability.
//!
//! Each external source (product catalog, brand rating dataset, retailer
//! directory, ethical-index search, web search) is an implementation of
//! [`Provider`]: given a typed query it returns a typed result, `NotFound`, or
//! a transport-class failure. Adapters own all parsing; the pipeline only ever
//! sees the typed outcome.
//!
//! ```rust,ignore
//! let catalog = OpenFoodFacts::new()?;
//! let barcode = Barcode::parse("3017620422003")?;
//!
//! match catalog.query(&barcode).await {
//!     Ok(product) => println!("{}", product.name_or_na()),
//!     Err(e) if e.is_not_found() => println!("unknown product"),
//!     Err(e) => eprintln!("lookup failed: {e}"),
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;
use crate::types::{
    barcode::Barcode, product::ProductRecord, rating::BrandRating, search::SearchHit,
};

/// Identity of a data source, recorded in the report's source trail and on
/// every finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    ProductCatalog,
    BrandRatings,
    RetailerDirectory,
    EthicalIndex,
    WebSearch,
    /// Built-in keyword rule for food brands. Never consulted over the
    /// network, so it only appears on findings, not in the source trail.
    FoodHeuristic,
}

impl ProviderId {
    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductCatalog => "product_catalog",
            Self::BrandRatings => "brand_ratings",
            Self::RetailerDirectory => "retailer_directory",
            Self::EthicalIndex => "ethical_index",
            Self::WebSearch => "web_search",
            Self::FoodHeuristic => "food_heuristic",
        }
    }

    /// Human-readable name used in logs and rendered reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ProductCatalog => "Product Catalog",
            Self::BrandRatings => "Brand Ratings",
            Self::RetailerDirectory => "Retailer Directory",
            Self::EthicalIndex => "Ethical Index",
            Self::WebSearch => "Web Search",
            Self::FoodHeuristic => "Food Heuristic",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A queryable data source.
///
/// `Query` is `?Sized` so text-keyed sources can take `&str` directly.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Input the source is keyed by.
    type Query: ?Sized + Sync;

    /// Typed partial result the source yields.
    type Output: Send;

    /// Which source this is.
    fn id(&self) -> ProviderId;

    /// Look up `input`.
    ///
    /// Returns `ProviderError::NotFound` when the source has no record, and a
    /// transport-class error when the source could not be reached or parsed.
    async fn query(&self, input: &Self::Query) -> ProviderResult<Self::Output>;
}

/// Shared providers query through to the inner adapter, so a caller can keep
/// a handle (e.g. to inspect a dataset) after handing it to the pipeline.
#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    type Query = P::Query;
    type Output = P::Output;

    fn id(&self) -> ProviderId {
        (**self).id()
    }

    async fn query(&self, input: &Self::Query) -> ProviderResult<Self::Output> {
        (**self).query(input).await
    }
}

/// Barcode → commercial product facts.
pub type ProductCatalog = dyn Provider<Query = Barcode, Output = ProductRecord>;

/// Brand name → ethics rating record.
pub type BrandRatingSource = dyn Provider<Query = str, Output = BrandRating>;

/// Barcode → manufacturer name.
pub type RetailerDirectory = dyn Provider<Query = Barcode, Output = String>;

/// Brand → first site-search result.
pub type EthicalIndexSearch = dyn Provider<Query = str, Output = SearchHit>;

/// Free-text query → first result snippet.
pub type WebSearch = dyn Provider<Query = str, Output = String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_serializes_snake_case() {
        let json = serde_json::to_string(&ProviderId::RetailerDirectory).unwrap();
        assert_eq!(json, "\"retailer_directory\"");

        let back: ProviderId = serde_json::from_str("\"ethical_index\"").unwrap();
        assert_eq!(back, ProviderId::EthicalIndex);
    }

    #[test]
    fn test_as_str_matches_serde_name() {
        for id in [
            ProviderId::ProductCatalog,
            ProviderId::BrandRatings,
            ProviderId::RetailerDirectory,
            ProviderId::EthicalIndex,
            ProviderId::WebSearch,
            ProviderId::FoodHeuristic,
        ] {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_display_uses_human_name() {
        assert_eq!(ProviderId::WebSearch.to_string(), "Web Search");
    }
}
