//! The resolution pipeline.
//!
//! One barcode in, one [`ResolutionReport`] out. Providers are consulted in a
//! fixed order, each step feeding brand or manufacturer forward:
//!
//! ```text
//! catalog ─┬─ food ──────► food heuristic (terminal)
//!          ├─ apparel ───► brand ratings ──(miss)──┐
//!          └─ other ─────────────────────────────► ethical index ─► web search
//!                        (no brand: retailer directory → manufacturer first)
//! ```
//!
//! At most one finding is produced per resolution; the first step that yields
//! one ends the chain. Provider failures never escape: they are recorded in the
//! source trail and the chain advances.

use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::classify::{classify, food_status, Domain};
use crate::error::{ProviderError, Result, ScanError};
use crate::traits::provider::{
    BrandRatingSource, EthicalIndexSearch, ProductCatalog, Provider, ProviderId, RetailerDirectory,
    WebSearch,
};
use crate::types::{
    barcode::Barcode,
    config::PipelineConfig,
    finding::{labels, EthicalFinding},
    product::ProductRecord,
    rating::BrandRating,
    report::{CallOutcome, ResolutionReport, TrailEntry},
    search::SearchHit,
};

/// Resolves barcodes into reports.
///
/// Cheap to share: hold it in an `Arc` or borrow it across tasks. Resolutions
/// share nothing mutable except what the providers themselves share (the
/// once-loaded brand rating dataset).
pub struct Resolver {
    catalog: Arc<ProductCatalog>,
    brand_ratings: Arc<BrandRatingSource>,
    retailer_directory: Arc<RetailerDirectory>,
    ethical_index: Arc<EthicalIndexSearch>,
    web_search: Arc<WebSearch>,
    config: PipelineConfig,
}

impl Resolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve one barcode. Never fails; degraded results show up as an
    /// absent product or an empty `ethical` list.
    #[instrument(skip(self, barcode), fields(barcode = %barcode))]
    pub async fn resolve(&self, barcode: &Barcode) -> ResolutionReport {
        match self.run(barcode, None).await {
            Ok(report) => report,
            Err(e) => {
                // Only cancellation can fail a run, and no token was given.
                error!(error = %e, "Resolution failed without a cancellation token");
                ResolutionReport::new(barcode.clone(), None, Vec::new(), Vec::new())
            }
        }
    }

    /// Resolve with cancellation support.
    ///
    /// The token is checked before every provider call. A call already in
    /// flight is awaited (bounded by its timeout), then `Cancelled` is
    /// returned at the next checkpoint.
    #[instrument(skip(self, barcode, cancel), fields(barcode = %barcode))]
    pub async fn resolve_with_cancel(
        &self,
        barcode: &Barcode,
        cancel: CancellationToken,
    ) -> Result<ResolutionReport> {
        self.run(barcode, Some(&cancel)).await
    }

    /// Resolve independent barcodes concurrently. Reports come back in input
    /// order.
    pub async fn resolve_many(&self, barcodes: &[Barcode]) -> Vec<ResolutionReport> {
        info!(count = barcodes.len(), "Resolving barcodes");
        join_all(barcodes.iter().map(|barcode| self.resolve(barcode))).await
    }

    async fn run(
        &self,
        barcode: &Barcode,
        cancel: Option<&CancellationToken>,
    ) -> Result<ResolutionReport> {
        let mut trail = Trail::new(cancel);

        let product: Option<ProductRecord> = trail.call(&self.config, &*self.catalog, barcode).await?;

        let brand = product
            .as_ref()
            .map(|p| p.brand_or_empty().to_string())
            .unwrap_or_default();
        let domain = product
            .as_ref()
            .map(|p| classify(p.category_or_empty()))
            .unwrap_or(Domain::Other);

        debug!(brand = %brand, domain = %domain, "Classified product");

        let mut manufacturer = None;
        let finding = match domain {
            Domain::Food => Some(
                EthicalFinding::new(ProviderId::FoodHeuristic)
                    .with_entry(labels::STATUS, food_status(&brand)),
            ),
            Domain::ApparelOrPersonalCare => match self.rated_brand(&mut trail, &brand).await? {
                Some(finding) => Some(finding),
                None => {
                    self.fallback_chain(&mut trail, barcode, &brand, &mut manufacturer)
                        .await?
                }
            },
            Domain::Other => {
                self.fallback_chain(&mut trail, barcode, &brand, &mut manufacturer)
                    .await?
            }
        };

        match &finding {
            Some(f) => info!(source = %f.source(), "Ethical finding resolved"),
            None => info!("No ethical finding"),
        }

        Ok(ResolutionReport::new(
            barcode.clone(),
            product,
            finding.into_iter().collect(),
            trail.into_entries(),
        )
        .with_manufacturer(manufacturer))
    }

    /// Look the brand up in the local rating dataset. An empty brand cannot
    /// match any key, so the dataset is not consulted.
    async fn rated_brand(&self, trail: &mut Trail<'_>, brand: &str) -> Result<Option<EthicalFinding>> {
        if brand.is_empty() {
            return Ok(None);
        }

        let rating: Option<BrandRating> = trail.call(&self.config, &*self.brand_ratings, brand).await?;

        // A rating without a comment still reports an (empty) Comment entry.
        Ok(rating.map(|rating| {
            EthicalFinding::new(ProviderId::BrandRatings)
                .with_entry(labels::RATING, rating.rating)
                .with_entry(labels::COMMENT, rating.comment.unwrap_or_default())
        }))
    }

    /// Ethical index, then web search. With no brand, the retailer directory
    /// supplies a manufacturer name first (one indirection, no retry); a
    /// non-empty name is stored in `manufacturer` for the report.
    async fn fallback_chain(
        &self,
        trail: &mut Trail<'_>,
        barcode: &Barcode,
        brand: &str,
        manufacturer: &mut Option<String>,
    ) -> Result<Option<EthicalFinding>> {
        let subject = if brand.is_empty() {
            let found: Option<String> =
                trail.call(&self.config, &*self.retailer_directory, barcode).await?;
            *manufacturer = found.clone().filter(|name| !name.is_empty());
            found.unwrap_or_default()
        } else {
            brand.to_string()
        };

        if subject.is_empty() {
            return Ok(None);
        }

        let hit: Option<SearchHit> = trail.call(&self.config, &*self.ethical_index, subject.as_str()).await?;
        if let Some(hit) = hit {
            return Ok(Some(
                EthicalFinding::new(ProviderId::EthicalIndex).with_entry(labels::TOP_MATCH, hit.summary()),
            ));
        }

        let query = self.config.web_search_query(&subject);
        let snippet: Option<String> = trail.call(&self.config, &*self.web_search, query.as_str()).await?;

        Ok(snippet.map(|snippet| {
            EthicalFinding::new(ProviderId::WebSearch).with_entry(labels::SNIPPET, snippet)
        }))
    }
}

/// Per-resolution record of provider consultations.
struct Trail<'a> {
    cancel: Option<&'a CancellationToken>,
    entries: Vec<TrailEntry>,
}

impl<'a> Trail<'a> {
    fn new(cancel: Option<&'a CancellationToken>) -> Self {
        Self {
            cancel,
            entries: Vec::new(),
        }
    }

    /// Consult one provider under its timeout and record the outcome.
    ///
    /// `Ok(None)` covers both "no record" and failures; the trail keeps them
    /// apart. The only `Err` is cancellation.
    async fn call<P>(
        &mut self,
        config: &PipelineConfig,
        provider: &P,
        input: &P::Query,
    ) -> Result<Option<P::Output>>
    where
        P: Provider + ?Sized,
    {
        if self.cancel.is_some_and(|token| token.is_cancelled()) {
            info!(entries = self.entries.len(), "Resolution cancelled");
            return Err(ScanError::Cancelled);
        }

        let id = provider.id();
        let limit = config.timeout_for(id);

        let result = match tokio::time::timeout(limit, provider.query(input)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: id,
                after: limit,
            }),
        };

        let (outcome, value) = match result {
            Ok(value) => {
                debug!(provider = %id, "Provider returned a record");
                (CallOutcome::Found, Some(value))
            }
            Err(ProviderError::NotFound) => {
                debug!(provider = %id, "Provider has no record");
                (CallOutcome::NotFound, None)
            }
            Err(e) => {
                warn!(provider = %id, error = %e, "Provider call failed, continuing");
                (CallOutcome::Failed, None)
            }
        };

        self.entries.push(TrailEntry::new(id, outcome));
        Ok(value)
    }

    fn into_entries(self) -> Vec<TrailEntry> {
        self.entries
    }
}

/// Assembles a [`Resolver`]. Every provider is required.
#[derive(Default)]
pub struct ResolverBuilder {
    catalog: Option<Arc<ProductCatalog>>,
    brand_ratings: Option<Arc<BrandRatingSource>>,
    retailer_directory: Option<Arc<RetailerDirectory>>,
    ethical_index: Option<Arc<EthicalIndexSearch>>,
    web_search: Option<Arc<WebSearch>>,
    config: PipelineConfig,
}

impl ResolverBuilder {
    pub fn product_catalog(
        mut self,
        provider: impl Provider<Query = Barcode, Output = ProductRecord> + 'static,
    ) -> Self {
        self.catalog = Some(Arc::new(provider));
        self
    }

    pub fn brand_ratings(
        mut self,
        provider: impl Provider<Query = str, Output = BrandRating> + 'static,
    ) -> Self {
        self.brand_ratings = Some(Arc::new(provider));
        self
    }

    pub fn retailer_directory(
        mut self,
        provider: impl Provider<Query = Barcode, Output = String> + 'static,
    ) -> Self {
        self.retailer_directory = Some(Arc::new(provider));
        self
    }

    pub fn ethical_index(
        mut self,
        provider: impl Provider<Query = str, Output = SearchHit> + 'static,
    ) -> Self {
        self.ethical_index = Some(Arc::new(provider));
        self
    }

    pub fn web_search(mut self, provider: impl Provider<Query = str, Output = String> + 'static) -> Self {
        self.web_search = Some(Arc::new(provider));
        self
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Resolver> {
        Ok(Resolver {
            catalog: required(self.catalog, ProviderId::ProductCatalog)?,
            brand_ratings: required(self.brand_ratings, ProviderId::BrandRatings)?,
            retailer_directory: required(self.retailer_directory, ProviderId::RetailerDirectory)?,
            ethical_index: required(self.ethical_index, ProviderId::EthicalIndex)?,
            web_search: required(self.web_search, ProviderId::WebSearch)?,
            config: self.config,
        })
    }
}

fn required<T: ?Sized>(provider: Option<Arc<T>>, id: ProviderId) -> Result<Arc<T>> {
    provider.ok_or_else(|| ScanError::Config {
        reason: format!("no {} provider configured", id.as_str()),
    })
}
