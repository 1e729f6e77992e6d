//! BarcodeLookup retailer directory adapter.
//!
//! Maps a barcode to the manufacturer name listed by retailers, used when the
//! product catalog has no brand.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::http::{build_client, fetch_json};
use crate::error::{ProviderError, ProviderResult, Result};
use crate::security::SecretString;
use crate::traits::provider::{Provider, ProviderId};
use crate::types::barcode::Barcode;

const DEFAULT_BASE_URL: &str = "https://api.barcodelookup.com";

/// The directory rejects requests without a browser-like agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    products: Vec<LookupProduct>,
}

#[derive(Debug, Deserialize)]
struct LookupProduct {
    manufacturer: Option<String>,
}

/// Retailer directory backed by the BarcodeLookup v3 API.
pub struct BarcodeLookup {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl BarcodeLookup {
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(build_client(BROWSER_USER_AGENT)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Provider for BarcodeLookup {
    type Query = Barcode;
    type Output = String;

    fn id(&self) -> ProviderId {
        ProviderId::RetailerDirectory
    }

    async fn query(&self, barcode: &Barcode) -> ProviderResult<String> {
        // Without a key every call would be rejected upstream.
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::transport(self.id(), "API key not configured"))?;

        let request = self
            .client
            .get(format!("{}/v3/products", self.base_url))
            .query(&[
                ("barcode", barcode.as_str()),
                ("formatted", "y"),
                ("key", api_key.expose()),
            ]);

        let response: LookupResponse = fetch_json(self.id(), request).await?;
        first_manufacturer(response)
    }
}

fn first_manufacturer(response: LookupResponse) -> ProviderResult<String> {
    response
        .products
        .into_iter()
        .next()
        .and_then(|product| product.manufacturer)
        .map(|manufacturer| manufacturer.trim().to_string())
        .filter(|manufacturer| !manufacturer.is_empty())
        .ok_or(ProviderError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::http::parse_json;

    fn parse(body: &str) -> ProviderResult<String> {
        let response: LookupResponse = parse_json(ProviderId::RetailerDirectory, body)?;
        first_manufacturer(response)
    }

    #[test]
    fn test_first_product_manufacturer() {
        let body = r#"{
            "products": [
                { "barcode_number": "0889842640816", "title": "Trail Shorts", "manufacturer": " Patagonia Inc. " },
                { "barcode_number": "0889842640816", "manufacturer": "Someone Else" }
            ]
        }"#;
        assert_eq!(parse(body).unwrap(), "Patagonia Inc.");
    }

    #[test]
    fn test_blank_manufacturer_is_not_found() {
        assert!(parse(r#"{"products": [{"manufacturer": "  "}]}"#).unwrap_err().is_not_found());
        assert!(parse(r#"{"products": [{"title": "No maker"}]}"#).unwrap_err().is_not_found());
    }

    #[test]
    fn test_empty_product_list_is_not_found() {
        assert!(parse(r#"{"products": []}"#).unwrap_err().is_not_found());
        assert!(parse(r#"{}"#).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_missing_key_is_transport_failure() {
        let directory = BarcodeLookup::with_client(Client::new());
        let barcode = Barcode::parse("0889842640816").unwrap();

        let err = directory.query(&barcode).await.unwrap_err();
        match err {
            ProviderError::Transport { provider, message } => {
                assert_eq!(provider, ProviderId::RetailerDirectory);
                assert_eq!(message, "API key not configured");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_error_does_not_expose_key() {
        let directory = BarcodeLookup::with_client(Client::new())
            .with_base_url("http://127.0.0.1:1")
            .with_api_key("bl-secret-key");
        let barcode = Barcode::parse("0889842640816").unwrap();

        let err = directory.query(&barcode).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Transport { provider: ProviderId::RetailerDirectory, .. }
        ));
        assert!(!err.to_string().contains("bl-secret-key"));
        assert!(!format!("{err:?}").contains("bl-secret-key"));
    }
}
