use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use ethical_scan::DEFAULT_USER_AGENT;

/// CLI configuration loaded from environment variables.
///
/// Every credential is optional. A provider without one is still consulted
/// and fails, which the report records.
#[derive(Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    pub barcode_lookup_api_key: Option<String>,
    pub brand_ratings_path: PathBuf,
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            google_api_key: non_blank("GOOGLE_API_KEY"),
            google_cse_id: non_blank("GOOGLE_CSE_ID"),
            barcode_lookup_api_key: non_blank("BARCODE_LOOKUP_API_KEY"),
            brand_ratings_path: non_blank("BRAND_RATINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("goodonyou.json")),
            user_agent: non_blank("HTTP_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Config")
            .field("google_api_key", &redact(&self.google_api_key))
            .field("google_cse_id", &self.google_cse_id)
            .field("barcode_lookup_api_key", &redact(&self.barcode_lookup_api_key))
            .field("brand_ratings_path", &self.brand_ratings_path)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert!(config.google_api_key.is_none());
        assert!(config.barcode_lookup_api_key.is_none());
        assert_eq!(config.brand_ratings_path, PathBuf::from("goodonyou.json"));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config_from(&[("GOOGLE_API_KEY", "  "), ("BRAND_RATINGS_PATH", "")]);
        assert!(config.google_api_key.is_none());
        assert_eq!(config.brand_ratings_path, PathBuf::from("goodonyou.json"));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", "AIza-secret"),
            ("GOOGLE_CSE_ID", "c05a0c9e0acc"),
            ("BARCODE_LOOKUP_API_KEY", "bl-secret"),
        ]);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("AIza-secret"));
        assert!(!debug.contains("bl-secret"));
        assert!(debug.contains("c05a0c9e0acc"));
    }
}
