//! Ethical Consumer site-search adapter.
//!
//! The site has no API, so the adapter fetches the public search page and
//! pulls the first result heading out of the HTML.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::{form_urlencoded, Url};

use super::http::{build_client, fetch_text, DEFAULT_USER_AGENT};
use crate::error::{ProviderError, ProviderResult, Result};
use crate::traits::provider::{Provider, ProviderId};
use crate::types::search::SearchHit;

const DEFAULT_BASE_URL: &str = "https://www.ethicalconsumer.org";

/// Containers holding the organic results, most specific first. Anything
/// outside them is navigation and promotions.
const RESULTS_CONTAINERS: &[&str] = &[".search-results", ".view-content", "main"];

const RESULT_HEADING_LINK: &str = "h2 a[href], h3 a[href], h4 a[href]";

/// Public search page for `keywords`, for people to follow up by hand.
pub fn search_page_url(keywords: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(keywords.as_bytes()).collect();
    format!("{}/search?keywords={}", DEFAULT_BASE_URL, encoded)
}

/// Ethical-index search backed by ethicalconsumer.org.
pub struct EthicalConsumer {
    client: Client,
    base_url: String,
}

impl EthicalConsumer {
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(build_client(DEFAULT_USER_AGENT)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Provider for EthicalConsumer {
    type Query = str;
    type Output = SearchHit;

    fn id(&self) -> ProviderId {
        ProviderId::EthicalIndex
    }

    async fn query(&self, brand: &str) -> ProviderResult<SearchHit> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("keywords", brand)]);

        let html = fetch_text(self.id(), request).await?;
        first_result(&html, &self.base_url).ok_or(ProviderError::NotFound)
    }
}

/// First usable result heading in a search page.
fn first_result(html: &str, base_url: &str) -> Option<SearchHit> {
    let document = Html::parse_document(html);
    let heading_link = match Selector::parse(RESULT_HEADING_LINK) {
        Ok(s) => s,
        Err(_) => return None,
    };

    let results = RESULTS_CONTAINERS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let base = Url::parse(base_url).ok();

    results.select(&heading_link).find_map(|el| {
        let href = el.value().attr("href")?.trim();
        if href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
            return None;
        }

        let title = element_text(&el);
        if title.is_empty() {
            return None;
        }

        let link = match &base {
            Some(base) => base.join(href).ok()?.to_string(),
            None => href.to_string(),
        };

        Some(SearchHit::new(title, link))
    })
}

/// Decoded text of an element with runs of whitespace collapsed.
fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r##"
        <html>
          <header>
            <nav><h2><a href="/subscribe">Subscribe today</a></h2></nav>
          </header>
          <main>
            <div class="search-results">
              <h3 class="result-title"><a href="#top">Back to top</a></h3>
              <h3 class="result-title">
                <a href="/fashion-clothing/shopping-guide/ethical-outdoor-clothing" class="link">
                  Ethical <strong>Outdoor</strong> Clothing &amp; Gear
                </a>
              </h3>
              <h3><a href="https://example.org/elsewhere">Second result</a></h3>
            </div>
          </main>
        </html>
    "##;

    #[test]
    fn test_first_result_inside_results_container() {
        let hit = first_result(SEARCH_PAGE, DEFAULT_BASE_URL).unwrap();

        assert_eq!(hit.title, "Ethical Outdoor Clothing & Gear");
        assert_eq!(
            hit.link,
            "https://www.ethicalconsumer.org/fashion-clothing/shopping-guide/ethical-outdoor-clothing"
        );
    }

    #[test]
    fn test_absolute_links_are_kept() {
        let html = r#"<div class="search-results"><h2><a href='https://example.org/a'>A</a></h2></div>"#;
        let hit = first_result(html, DEFAULT_BASE_URL).unwrap();
        assert_eq!(hit.link, "https://example.org/a");
    }

    #[test]
    fn test_no_results_is_none() {
        let html = r#"<main><div class="search-results"><p>No results found.</p></div></main>"#;
        assert!(first_result(html, DEFAULT_BASE_URL).is_none());
    }

    #[test]
    fn test_javascript_links_are_skipped() {
        let html = r#"<div class="search-results">
            <h4><a href="javascript:void(0)">Load more</a></h4>
            <h4><a href="/company/acme">Acme Ltd</a></h4>
        </div>"#;
        let hit = first_result(html, DEFAULT_BASE_URL).unwrap();
        assert_eq!(hit.title, "Acme Ltd");
    }

    #[test]
    fn test_numeric_entities_are_decoded() {
        let html = r#"<div class="view-content">
            <h2><a href="/company/ben-jerrys">Ben&nbsp;&amp; <em>Jerry&#8217;s</em> &#x27;Ice Cream&#x27;</a></h2>
        </div>"#;
        let hit = first_result(html, DEFAULT_BASE_URL).unwrap();
        assert_eq!(hit.title, "Ben & Jerry\u{2019}s 'Ice Cream'");
        assert_eq!(hit.link, "https://www.ethicalconsumer.org/company/ben-jerrys");
    }

    #[test]
    fn test_page_without_container_falls_back_to_whole_document() {
        let html = r#"<html><body><h3><a href="/company/acme">Acme Ltd</a></h3></body></html>"#;
        let hit = first_result(html, DEFAULT_BASE_URL).unwrap();
        assert_eq!(hit.title, "Acme Ltd");
    }

    #[test]
    fn test_search_page_url_encodes_keywords() {
        assert_eq!(
            search_page_url("Ben & Jerry's"),
            "https://www.ethicalconsumer.org/search?keywords=Ben+%26+Jerry%27s"
        );
    }
}
