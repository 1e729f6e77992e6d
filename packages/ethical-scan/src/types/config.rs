//! Configuration types for the resolution pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::traits::provider::ProviderId;

/// Per-provider call bounds, in seconds.
///
/// A call that exceeds its bound is treated as a transport failure and is
/// not retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderTimeouts {
    pub product_catalog_secs: u64,
    pub brand_ratings_secs: u64,
    pub retailer_directory_secs: u64,
    pub ethical_index_secs: u64,
    pub web_search_secs: u64,
}

impl Default for ProviderTimeouts {
    fn default() -> Self {
        Self {
            product_catalog_secs: 5,
            brand_ratings_secs: 5,
            retailer_directory_secs: 8,
            ethical_index_secs: 12,
            web_search_secs: 8,
        }
    }
}

impl ProviderTimeouts {
    /// Bound for one provider.
    pub fn for_provider(&self, provider: ProviderId) -> Duration {
        let secs = match provider {
            ProviderId::ProductCatalog => self.product_catalog_secs,
            ProviderId::BrandRatings | ProviderId::FoodHeuristic => self.brand_ratings_secs,
            ProviderId::RetailerDirectory => self.retailer_directory_secs,
            ProviderId::EthicalIndex => self.ethical_index_secs,
            ProviderId::WebSearch => self.web_search_secs,
        };
        Duration::from_secs(secs)
    }
}

/// Configuration for [`Resolver`](crate::Resolver).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub timeouts: ProviderTimeouts,

    /// Appended to the brand to form the web-search query.
    ///
    /// Default: `" ethical rating"`.
    pub web_search_suffix: String,

    /// Overrides every provider bound when set. Intended for tests that need
    /// sub-second timeouts.
    #[serde(skip)]
    pub timeout_override: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeouts: ProviderTimeouts::default(),
            web_search_suffix: " ethical rating".to_string(),
            timeout_override: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeouts(mut self, timeouts: ProviderTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_web_search_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.web_search_suffix = suffix.into();
        self
    }

    pub fn with_timeout_override(mut self, limit: Duration) -> Self {
        self.timeout_override = Some(limit);
        self
    }

    /// Effective bound for one provider call.
    pub fn timeout_for(&self, provider: ProviderId) -> Duration {
        self.timeout_override
            .unwrap_or_else(|| self.timeouts.for_provider(provider))
    }

    /// Web-search query for a brand.
    pub fn web_search_query(&self, brand: &str) -> String {
        format!("{}{}", brand, self.web_search_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds_match_provider_criticality() {
        let timeouts = ProviderTimeouts::default();
        assert_eq!(timeouts.for_provider(ProviderId::ProductCatalog), Duration::from_secs(5));
        assert_eq!(timeouts.for_provider(ProviderId::EthicalIndex), Duration::from_secs(12));
    }

    #[test]
    fn test_override_wins() {
        let config = PipelineConfig::new().with_timeout_override(Duration::from_millis(50));
        assert_eq!(config.timeout_for(ProviderId::WebSearch), Duration::from_millis(50));
    }

    #[test]
    fn test_web_search_query() {
        let config = PipelineConfig::default();
        assert_eq!(config.web_search_query("Patagonia"), "Patagonia ethical rating");
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"timeouts": {"web_search_secs": 3}}"#).unwrap();
        assert_eq!(config.timeouts.web_search_secs, 3);
        assert_eq!(config.timeouts.product_catalog_secs, 5);
        assert_eq!(config.web_search_suffix, " ethical rating");
    }
}
