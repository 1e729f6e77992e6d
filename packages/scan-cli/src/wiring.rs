//! Assembles the real adapters into a resolver.

use std::path::PathBuf;

use anyhow::{Context, Result};
use ethical_scan::{
    build_client, BarcodeLookup, BrandRatingDataset, EthicalConsumer, GoogleSearch, OpenFoodFacts,
    PipelineConfig, Resolver,
};
use tracing::{debug, warn};

use crate::config::Config;

pub fn build_resolver(config: &Config, ratings_override: Option<PathBuf>) -> Result<Resolver> {
    let client = build_client(&config.user_agent).context("Failed to build HTTP client")?;

    let ratings_path = ratings_override.unwrap_or_else(|| config.brand_ratings_path.clone());
    debug!(path = %ratings_path.display(), "Brand ratings dataset");

    let mut directory = BarcodeLookup::new().context("Failed to build retailer directory client")?;
    match &config.barcode_lookup_api_key {
        Some(key) => directory = directory.with_api_key(key.as_str()),
        None => warn!("BARCODE_LOOKUP_API_KEY not set; retailer directory lookups will fail"),
    }

    let mut web_search = GoogleSearch::with_client(client.clone());
    match (&config.google_api_key, &config.google_cse_id) {
        (Some(key), Some(cx)) => web_search = web_search.with_credentials(key.as_str(), cx.as_str()),
        _ => warn!("GOOGLE_API_KEY or GOOGLE_CSE_ID not set; web search lookups will fail"),
    }

    let resolver = Resolver::builder()
        .product_catalog(OpenFoodFacts::with_client(client.clone()))
        .brand_ratings(BrandRatingDataset::from_path(ratings_path))
        .retailer_directory(directory)
        .ethical_index(EthicalConsumer::with_client(client))
        .web_search(web_search)
        .config(PipelineConfig::default())
        .build()?;

    Ok(resolver)
}
