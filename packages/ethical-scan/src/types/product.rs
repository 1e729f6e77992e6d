//! Commercial product facts from the product catalog.

use serde::{Deserialize, Serialize};

/// Placeholder rendered for any absent product field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Product facts as reported by the catalog. Every field may be absent.
///
/// Blank strings are normalised to `None` on the way in, so a present field
/// always carries visible text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: Option<String>,
    pub brand: Option<String>,
    /// Raw category string, e.g. "Snacks, Sweet spreads, Food"
    pub category: Option<String>,
    pub labels: Option<String>,
    pub ingredients_text: Option<String>,
    /// Nutri-Score grade (a-e) when the catalog has one
    pub nutriscore: Option<String>,
}

impl ProductRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = normalize(name);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = normalize(brand);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize(category);
        self
    }

    pub fn with_labels(mut self, labels: impl Into<String>) -> Self {
        self.labels = normalize(labels);
        self
    }

    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients_text = normalize(ingredients);
        self
    }

    pub fn with_nutriscore(mut self, grade: impl Into<String>) -> Self {
        self.nutriscore = normalize(grade);
        self
    }

    /// Brand for downstream lookups; empty when absent.
    pub fn brand_or_empty(&self) -> &str {
        self.brand.as_deref().unwrap_or("")
    }

    /// Category for classification; empty when absent.
    pub fn category_or_empty(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn name_or_na(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Labelled fields in display order, absent values rendered as "N/A".
    pub fn display_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("Product Name", show(&self.name)),
            ("Brand", show(&self.brand)),
            ("Category", show(&self.category)),
            ("Labels", show(&self.labels)),
            ("Ingredients Info", show(&self.ingredients_text)),
            ("Nutri-Score", show(&self.nutriscore)),
        ]
    }
}

fn show(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Trim a raw value and drop it if nothing visible remains.
pub(crate) fn normalize(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
