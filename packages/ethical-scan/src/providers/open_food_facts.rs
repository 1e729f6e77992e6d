//! OpenFoodFacts product catalog adapter.
//!
//! `GET {base}/api/v0/product/{barcode}.json`. A body with `status != 1` (or
//! no `product` object) means the catalog has no record for the barcode.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::http::{build_client, fetch_json, DEFAULT_USER_AGENT};
use crate::error::{ProviderError, ProviderResult, Result};
use crate::traits::provider::{Provider, ProviderId};
use crate::types::{barcode::Barcode, product::ProductRecord};

const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    product: Option<ProductData>,
}

#[derive(Debug, Default, Deserialize)]
struct ProductData {
    product_name: Option<String>,
    brands: Option<String>,
    categories: Option<String>,
    labels: Option<String>,
    ingredients_text: Option<String>,
    nutriscore_grade: Option<String>,
}

/// Product catalog backed by the OpenFoodFacts public API.
pub struct OpenFoodFacts {
    client: Client,
    base_url: String,
}

impl OpenFoodFacts {
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(build_client(DEFAULT_USER_AGENT)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point at a different host (mirror or local test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn product_url(&self, barcode: &Barcode) -> String {
        format!("{}/api/v0/product/{}.json", self.base_url, barcode)
    }
}

#[async_trait]
impl Provider for OpenFoodFacts {
    type Query = Barcode;
    type Output = ProductRecord;

    fn id(&self) -> ProviderId {
        ProviderId::ProductCatalog
    }

    async fn query(&self, barcode: &Barcode) -> ProviderResult<ProductRecord> {
        let request = self.client.get(self.product_url(barcode));
        let response: ProductResponse = fetch_json(self.id(), request).await?;
        into_record(response)
    }
}

fn into_record(response: ProductResponse) -> ProviderResult<ProductRecord> {
    let data = match response.product {
        Some(data) if response.status == 1 => data,
        _ => return Err(ProviderError::NotFound),
    };

    let mut record = ProductRecord::new();
    if let Some(name) = data.product_name {
        record = record.with_name(name);
    }
    if let Some(brand) = data.brands {
        record = record.with_brand(brand);
    }
    if let Some(category) = data.categories {
        record = record.with_category(category);
    }
    if let Some(labels) = data.labels {
        record = record.with_labels(labels);
    }
    if let Some(ingredients) = data.ingredients_text {
        record = record.with_ingredients(ingredients);
    }
    if let Some(grade) = data.nutriscore_grade {
        record = record.with_nutriscore(grade);
    }
    Ok(record)
}
