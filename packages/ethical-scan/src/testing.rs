//! Testing utilities including mock providers.
//!
//! Useful for testing code that drives the resolver without making real
//! network calls or reading a dataset from disk.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ProviderError, ProviderResult};
use crate::pipeline::resolve::Resolver;
use crate::traits::provider::{Provider, ProviderId};
use crate::types::{
    barcode::Barcode, config::PipelineConfig, product::ProductRecord, rating::BrandRating,
    search::SearchHit,
};

/// Query types a [`MockProvider`] can be scripted by.
pub trait MockKey: Sync {
    /// The key responses are scripted under and calls are recorded as.
    fn mock_key(&self) -> String;
}

impl MockKey for str {
    fn mock_key(&self) -> String {
        self.to_string()
    }
}

impl MockKey for Barcode {
    fn mock_key(&self) -> String {
        self.as_str().to_string()
    }
}

/// A scripted provider response.
#[derive(Debug, Clone)]
pub enum MockResponse<O> {
    Found(O),
    NotFound,
    Transport(String),
    Malformed(String),
}

impl<O: Clone> MockResponse<O> {
    fn to_result(&self, provider: ProviderId) -> ProviderResult<O> {
        match self {
            Self::Found(value) => Ok(value.clone()),
            Self::NotFound => Err(ProviderError::NotFound),
            Self::Transport(message) => Err(ProviderError::transport(provider, message)),
            Self::Malformed(message) => Err(ProviderError::malformed(provider, message)),
        }
    }
}

/// A mock provider with scripted responses and call tracking.
///
/// Unscripted queries get the default response (`NotFound` unless changed
/// with [`failing_with`](Self::failing_with)). Clones share scripted responses
/// and the call log, so a test can hand one clone to the resolver and assert
/// on another.
pub struct MockProvider<Q: ?Sized, O> {
    id: ProviderId,

    /// Scripted responses by query key
    responses: Arc<RwLock<HashMap<String, MockResponse<O>>>>,

    /// Response for unscripted queries
    default: Arc<RwLock<MockResponse<O>>>,

    /// Artificial latency applied to every call
    delay: Option<Duration>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<String>>>,

    _query: PhantomData<fn(&Q)>,
}

impl<Q: ?Sized, O> MockProvider<Q, O> {
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            responses: Arc::new(RwLock::new(HashMap::new())),
            default: Arc::new(RwLock::new(MockResponse::NotFound)),
            delay: None,
            calls: Arc::new(RwLock::new(Vec::new())),
            _query: PhantomData,
        }
    }

    /// Script the response for one query key.
    pub fn with_response(self, key: impl Into<String>, response: MockResponse<O>) -> Self {
        self.responses.write().unwrap().insert(key.into(), response);
        self
    }

    pub fn with_found(self, key: impl Into<String>, value: impl Into<O>) -> Self {
        self.with_response(key, MockResponse::Found(value.into()))
    }

    pub fn with_transport_error(self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_response(key, MockResponse::Transport(message.into()))
    }

    pub fn with_malformed(self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_response(key, MockResponse::Malformed(message.into()))
    }

    /// Make every unscripted query fail with a transport error.
    pub fn failing_with(self, message: impl Into<String>) -> Self {
        *self.default.write().unwrap() = MockResponse::Transport(message.into());
        self
    }

    /// Delay every response, e.g. to trip a timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Query keys received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

impl<Q: ?Sized, O> Clone for MockProvider<Q, O> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            responses: Arc::clone(&self.responses),
            default: Arc::clone(&self.default),
            delay: self.delay,
            calls: Arc::clone(&self.calls),
            _query: PhantomData,
        }
    }
}

#[async_trait]
impl<Q, O> Provider for MockProvider<Q, O>
where
    Q: MockKey + ?Sized + 'static,
    O: Clone + Send + Sync + 'static,
{
    type Query = Q;
    type Output = O;

    fn id(&self) -> ProviderId {
        self.id
    }

    async fn query(&self, input: &Q) -> ProviderResult<O> {
        let key = input.mock_key();
        self.calls.write().unwrap().push(key.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.responses.read().unwrap().get(&key).cloned();
        match scripted {
            Some(response) => response.to_result(self.id),
            None => self.default.read().unwrap().to_result(self.id),
        }
    }
}

/// One mock per pipeline slot, all defaulting to `NotFound`.
///
/// ```rust,ignore
/// let mocks = MockProviders::new()
///     .with_product("0889842640816", product)
///     .with_rating("Patagonia", BrandRating::new("Great", "B Corp"));
///
/// let report = mocks.resolver().resolve(&barcode).await;
/// assert_eq!(mocks.web_search.call_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockProviders {
    pub catalog: MockProvider<Barcode, ProductRecord>,
    pub brand_ratings: MockProvider<str, BrandRating>,
    pub retailer_directory: MockProvider<Barcode, String>,
    pub ethical_index: MockProvider<str, SearchHit>,
    pub web_search: MockProvider<str, String>,
}

impl Default for MockProviders {
    fn default() -> Self {
        Self {
            catalog: MockProvider::new(ProviderId::ProductCatalog),
            brand_ratings: MockProvider::new(ProviderId::BrandRatings),
            retailer_directory: MockProvider::new(ProviderId::RetailerDirectory),
            ethical_index: MockProvider::new(ProviderId::EthicalIndex),
            web_search: MockProvider::new(ProviderId::WebSearch),
        }
    }
}

impl MockProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, barcode: &str, product: ProductRecord) -> Self {
        self.catalog = self.catalog.with_found(barcode, product);
        self
    }

    pub fn with_rating(mut self, brand: &str, rating: BrandRating) -> Self {
        self.brand_ratings = self.brand_ratings.with_found(brand, rating);
        self
    }

    pub fn with_manufacturer(mut self, barcode: &str, manufacturer: &str) -> Self {
        self.retailer_directory = self.retailer_directory.with_found(barcode, manufacturer);
        self
    }

    pub fn with_hit(mut self, brand: &str, hit: SearchHit) -> Self {
        self.ethical_index = self.ethical_index.with_found(brand, hit);
        self
    }

    pub fn with_snippet(mut self, query: &str, snippet: &str) -> Self {
        self.web_search = self.web_search.with_found(query, snippet);
        self
    }

    /// A resolver over clones of these mocks with the default config.
    pub fn resolver(&self) -> Resolver {
        self.resolver_with(PipelineConfig::default())
    }

    pub fn resolver_with(&self, config: PipelineConfig) -> Resolver {
        Resolver::builder()
            .product_catalog(self.catalog.clone())
            .brand_ratings(self.brand_ratings.clone())
            .retailer_directory(self.retailer_directory.clone())
            .ethical_index(self.ethical_index.clone())
            .web_search(self.web_search.clone())
            .config(config)
            .build()
            .expect("every slot is populated")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_and_default_responses() {
        let mock: MockProvider<str, String> = MockProvider::new(ProviderId::WebSearch)
            .with_found("acme ethical rating", "Acme is rated 3/5")
            .with_malformed("broken", "unexpected token");

        assert_eq!(mock.query("acme ethical rating").await.unwrap(), "Acme is rated 3/5");
        assert!(mock.query("unknown").await.unwrap_err().is_not_found());
        assert!(matches!(
            mock.query("broken").await.unwrap_err(),
            ProviderError::MalformedResponse { .. }
        ));
        assert_eq!(mock.calls(), vec!["acme ethical rating", "unknown", "broken"]);
    }

    #[tokio::test]
    async fn test_clones_share_call_log() {
        let mock: MockProvider<Barcode, String> =
            MockProvider::new(ProviderId::RetailerDirectory).failing_with("HTTP 503");
        let handle = mock.clone();

        let err = mock.query(&Barcode::parse("123").unwrap()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { .. }));
        assert_eq!(handle.call_count(), 1);
    }
}
