//! Shared HTTP plumbing for the network-backed adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult, Result};
use crate::traits::provider::ProviderId;

/// User agent sent when the caller does not configure one.
pub const DEFAULT_USER_AGENT: &str = "EthicalScan/0.1 (barcode ethics lookup)";

/// Outer bound on any single request. The pipeline applies tighter
/// per-provider bounds on top of this.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error-body excerpt carried into a transport error.
const ERROR_BODY_LIMIT: usize = 200;

/// Build the HTTP client shared by the adapters.
pub fn build_client(user_agent: &str) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(user_agent)
        .timeout(CLIENT_TIMEOUT)
        .build()?)
}

/// Send `request` and return the body.
///
/// HTTP 404 maps to `NotFound`; any other non-2xx status is a transport error.
/// Request URLs carry API keys in their query strings, so client errors are
/// stripped of the URL before they become messages.
pub(crate) async fn fetch_text(provider: ProviderId, request: RequestBuilder) -> ProviderResult<String> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::transport(provider, e.without_url()))?;

    let status = response.status();
    debug!(provider = %provider, status = %status, "provider responded");

    if status == StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::transport(
            provider,
            format!("HTTP {}: {}", status, excerpt(&body)),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| ProviderError::transport(provider, e.without_url()))
}

/// Send `request` and decode a JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: ProviderId,
    request: RequestBuilder,
) -> ProviderResult<T> {
    let body = fetch_text(provider, request).await?;
    parse_json(provider, &body)
}

/// Decode a JSON body; shape mismatches are malformed responses.
pub(crate) fn parse_json<T: DeserializeOwned>(provider: ProviderId, body: &str) -> ProviderResult<T> {
    serde_json::from_str(body).map_err(|e| ProviderError::malformed(provider, e))
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_BODY_LIMIT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(ERROR_BODY_LIMIT).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_reports_malformed() {
        #[derive(Debug, serde::Deserialize)]
        struct Shape {
            #[allow(dead_code)]
            items: Vec<String>,
        }

        let err = parse_json::<Shape>(ProviderId::WebSearch, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse { provider: ProviderId::WebSearch, .. }));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "x".repeat(500);
        let cut = excerpt(&body);
        assert_eq!(cut.len(), ERROR_BODY_LIMIT + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(DEFAULT_USER_AGENT).is_ok());
    }
}
