//! Local brand → ethics rating dataset.
//!
//! The on-disk format is a single JSON object keyed by brand name exactly as
//! it should match (case-sensitive):
//!
//! ```json
//! {
//!   "Patagonia": { "rating": "Great", "comment": "Strong supply-chain transparency" },
//!   "Boohoo":    { "rating": "We avoid", "comment": "Little evidence of living wages" }
//! }
//! ```
//!
//! [`BrandRatingDataset`] loads the file at most once per instance. The load
//! runs as its own task, so a lookup that gives up waiting (a timeout, a
//! dropped future) leaves it running for the next caller instead of starting
//! a second read.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use tracing::{debug, error, info, warn};

use crate::error::{ProviderError, ProviderResult, Result, ScanError};
use crate::traits::provider::{Provider, ProviderId};
use crate::types::rating::BrandRating;

/// Parsed brand rating table. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct BrandRatings {
    ratings: HashMap<String, BrandRating>,
}

impl BrandRatings {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the dataset from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let ratings: HashMap<String, BrandRating> = serde_json::from_str(json)?;
        Ok(Self { ratings })
    }

    /// Read and parse the dataset file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScanError::Dataset {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&json)
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, brand: &str) -> Option<&BrandRating> {
        self.ratings.get(brand)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

impl FromIterator<(String, BrandRating)> for BrandRatings {
    fn from_iter<I: IntoIterator<Item = (String, BrandRating)>>(iter: I) -> Self {
        Self {
            ratings: iter.into_iter().collect(),
        }
    }
}

type SharedLoad = Shared<BoxFuture<'static, Arc<BrandRatings>>>;

/// The brand rating dataset as a provider, loaded lazily exactly once.
///
/// A missing file loads as an empty dataset (every brand is `NotFound`); a
/// malformed file does the same after logging the parse error. Neither is
/// retried.
pub struct BrandRatingDataset {
    load: SharedLoad,
    loads: Arc<AtomicUsize>,
}

impl BrandRatingDataset {
    /// Dataset read from `path` on first use.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_loader(load_or_empty(path.into()))
    }

    /// Dataset that is already in memory.
    pub fn preloaded(ratings: BrandRatings) -> Self {
        Self {
            load: future::ready(Arc::new(ratings)).boxed().shared(),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Dataset produced by `loader`, started by the first lookup.
    pub(crate) fn with_loader<F>(loader: F) -> Self
    where
        F: Future<Output = BrandRatings> + Send + 'static,
    {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);

        let load = async move {
            counter.fetch_add(1, Ordering::SeqCst);
            match tokio::spawn(loader).await {
                Ok(ratings) => Arc::new(ratings),
                Err(e) => {
                    error!(error = %e, "Brand ratings load task failed, using empty dataset");
                    Arc::new(BrandRatings::empty())
                }
            }
        }
        .boxed()
        .shared();

        Self { load, loads }
    }

    /// Number of times the dataset has been loaded. Never exceeds one.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// The shared table, loading it on first call.
    pub async fn ratings(&self) -> Arc<BrandRatings> {
        self.load.clone().await
    }
}

async fn load_or_empty(path: PathBuf) -> BrandRatings {
    match BrandRatings::load(&path).await {
        Ok(ratings) => {
            info!(path = %path.display(), brands = ratings.len(), "Loaded brand ratings");
            ratings
        }
        Err(ScanError::Dataset { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Brand ratings file not found, using empty dataset");
            BrandRatings::empty()
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Brand ratings unusable, using empty dataset");
            BrandRatings::empty()
        }
    }
}

#[async_trait]
impl Provider for BrandRatingDataset {
    type Query = str;
    type Output = BrandRating;

    fn id(&self) -> ProviderId {
        ProviderId::BrandRatings
    }

    async fn query(&self, brand: &str) -> ProviderResult<BrandRating> {
        let ratings = self.ratings().await;
        match ratings.get(brand) {
            Some(rating) => Ok(rating.clone()),
            None => {
                debug!(brand = %brand, "Brand not in rating dataset");
                Err(ProviderError::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const SAMPLE: &str = r#"{
        "Patagonia": { "rating": "Great", "comment": "Strong supply-chain transparency" },
        "Boohoo": { "rating": "We avoid", "comment": "Little evidence of living wages" }
    }"#;

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        let ratings = BrandRatings::from_json_str(SAMPLE).unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings.get("Patagonia").unwrap().rating, "Great");
        assert!(ratings.get("patagonia").is_none());
        assert!(ratings.get("Patagonia ").is_none());
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = BrandRatings::from_json_str(r#"["Patagonia"]"#).unwrap_err();
        assert!(matches!(err, ScanError::DatasetParse(_)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let ratings = BrandRatings::load(file.path()).await.unwrap();
        assert_eq!(ratings.get("Boohoo").unwrap().rating, "We avoid");
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_empty() {
        let dataset = BrandRatingDataset::from_path("/nonexistent/goodonyou.json");

        let err = dataset.query("Patagonia").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(dataset.load_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_file_degrades_to_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let dataset = BrandRatingDataset::from_path(file.path());
        assert!(dataset.query("Patagonia").await.unwrap_err().is_not_found());
        assert!(dataset.ratings().await.is_empty());
        assert_eq!(dataset.load_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_lookups_load_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Arc::new(BrandRatingDataset::from_path(file.path()));
        let lookups = (0..16).map(|i| {
            let dataset = Arc::clone(&dataset);
            tokio::spawn(async move {
                let brand = if i % 2 == 0 { "Patagonia" } else { "Boohoo" };
                dataset.query(brand).await
            })
        });

        for result in futures::future::join_all(lookups).await {
            assert!(result.unwrap().is_ok());
        }
        assert_eq!(dataset.load_count(), 1);
    }

    #[tokio::test]
    async fn test_slow_load_outlives_timed_out_lookups() {
        let dataset = BrandRatingDataset::with_loader(async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            BrandRatings::from_json_str(SAMPLE).unwrap()
        });

        for _ in 0..3 {
            let attempt =
                tokio::time::timeout(Duration::from_millis(20), dataset.query("Patagonia")).await;
            assert!(attempt.is_err());
        }

        let rating = dataset.query("Patagonia").await.unwrap();
        assert_eq!(rating.rating, "Great");
        assert_eq!(dataset.load_count(), 1);
    }

    #[tokio::test]
    async fn test_preloaded_never_reads() {
        let ratings: BrandRatings = [(
            "Veja".to_string(),
            BrandRating::new("Good", "Fair trade cotton"),
        )]
        .into_iter()
        .collect();

        let dataset = BrandRatingDataset::preloaded(ratings);
        let rating = dataset.query("Veja").await.unwrap();

        assert_eq!(rating.comment.as_deref(), Some("Fair trade cotton"));
        assert_eq!(dataset.load_count(), 0);
    }
}
