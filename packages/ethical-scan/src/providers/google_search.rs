//! Google Custom Search adapter, the last-resort web search.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::http::{build_client, fetch_json, DEFAULT_USER_AGENT};
use crate::error::{ProviderError, ProviderResult, Result};
use crate::security::ApiCredentials;
use crate::traits::provider::{Provider, ProviderId};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: Option<String>,
}

/// Web search backed by a Google Programmable Search Engine.
///
/// Needs an API key and the engine id (`cx`), carried as
/// [`ApiCredentials::account`].
pub struct GoogleSearch {
    client: Client,
    base_url: String,
    credentials: Option<ApiCredentials>,
}

impl GoogleSearch {
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(build_client(DEFAULT_USER_AGENT)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        self.credentials = Some(ApiCredentials::new(api_key).with_account(engine_id));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Provider for GoogleSearch {
    type Query = str;
    type Output = String;

    fn id(&self) -> ProviderId {
        ProviderId::WebSearch
    }

    async fn query(&self, query: &str) -> ProviderResult<String> {
        let (api_key, engine_id) = match &self.credentials {
            Some(ApiCredentials {
                api_key,
                account: Some(engine_id),
            }) => (api_key, engine_id),
            _ => {
                return Err(ProviderError::transport(
                    self.id(),
                    "API key or search engine id not configured",
                ))
            }
        };

        let request = self
            .client
            .get(format!("{}/customsearch/v1", self.base_url))
            .query(&[
                ("q", query),
                ("key", api_key.expose()),
                ("cx", engine_id.as_str()),
            ]);

        let response: SearchResponse = fetch_json(self.id(), request).await?;
        first_snippet(response)
    }
}

fn first_snippet(response: SearchResponse) -> ProviderResult<String> {
    response
        .items
        .into_iter()
        .next()
        .and_then(|item| item.snippet)
        .map(|snippet| snippet.trim().to_string())
        .filter(|snippet| !snippet.is_empty())
        .ok_or(ProviderError::NotFound)
}
