//! Barcode Ethics Resolution Library
//!
//! Turns a decoded product barcode into one report combining commercial
//! product facts with an ethical assessment of the brand, by consulting a
//! fixed set of providers in precedence order with fallback.
//!
//! # Resolution order
//!
//! 1. Product catalog (OpenFoodFacts) for name, brand and category
//! 2. By category:
//!    - food: keyword heuristic on the brand, nothing else
//!    - apparel / personal care: local brand rating dataset
//!    - anything else: straight to the fallback chain
//! 3. Fallback chain: ethical index search, then web search. Without a
//!    brand, the retailer directory supplies a manufacturer name first.
//!
//! Provider failures never abort a resolution. Every consultation is recorded
//! in the report's source trail as found, not found, or failed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ethical_scan::{
//!     Barcode, BarcodeLookup, BrandRatingDataset, EthicalConsumer, GoogleSearch, OpenFoodFacts,
//!     Resolver,
//! };
//!
//! let resolver = Resolver::builder()
//!     .product_catalog(OpenFoodFacts::new()?)
//!     .brand_ratings(BrandRatingDataset::from_path("goodonyou.json"))
//!     .retailer_directory(BarcodeLookup::new()?.with_api_key(key))
//!     .ethical_index(EthicalConsumer::new()?)
//!     .web_search(GoogleSearch::new()?.with_credentials(api_key, cx))
//!     .build()?;
//!
//! let report = resolver.resolve(&Barcode::parse("3017620422003")?).await;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The uniform provider capability
//! - [`types`] - Barcode, product, finding, and report types
//! - [`providers`] - HTTP and dataset adapters
//! - [`pipeline`] - Category classifier and resolver
//! - [`security`] - Redacting credential wrappers
//! - [`testing`] - Mock providers for testing

pub mod error;
pub mod pipeline;
pub mod providers;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ProviderError, ProviderResult, Result, ScanError};
pub use traits::provider::{
    BrandRatingSource, EthicalIndexSearch, ProductCatalog, Provider, ProviderId,
    RetailerDirectory, WebSearch,
};
pub use types::{
    barcode::Barcode,
    config::{PipelineConfig, ProviderTimeouts},
    finding::{labels, EthicalFinding},
    product::{ProductRecord, NOT_AVAILABLE},
    rating::BrandRating,
    report::{CallOutcome, ResolutionReport, TrailEntry},
    search::SearchHit,
};

// Re-export pipeline components
pub use pipeline::{classify, food_status, Domain, Resolver, ResolverBuilder};

// Re-export adapters
pub use providers::{
    build_client, BarcodeLookup, BrandRatingDataset, BrandRatings, EthicalConsumer, GoogleSearch,
    OpenFoodFacts, DEFAULT_USER_AGENT,
};

// Re-export testing utilities
pub use testing::{MockProvider, MockProviders, MockResponse};
