//! Category classification.
//!
//! Maps a product's raw category string to the domain that decides which
//! ethical-lookup strategy runs. Keyword rules are checked in a fixed order
//! and the first match wins, so a category mentioning both clothing and food
//! is apparel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Keywords for apparel and personal care. Checked first.
const APPAREL_KEYWORDS: &[&str] = &["clothing", "personal care"];

/// Keywords for food.
const FOOD_KEYWORDS: &[&str] = &["food"];

/// Brand keywords that mark a food product as organic or fair trade.
const FRIENDLY_BRAND_KEYWORDS: &[&str] = &["organic", "fair"];

/// Food status for brands matching [`FRIENDLY_BRAND_KEYWORDS`].
pub const FRIENDLY_FOOD_STATUS: &str = "Organic / Fair Trade friendly";

/// Food status for every other brand.
pub const STANDARD_FOOD_STATUS: &str = "Standard food product";

/// Which ethical-lookup strategy applies to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Food,
    ApparelOrPersonalCare,
    Other,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Food => f.write_str("food"),
            Self::ApparelOrPersonalCare => f.write_str("apparel_or_personal_care"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// Classify a raw category string. Case-insensitive substring match.
pub fn classify(raw_category: &str) -> Domain {
    let category = raw_category.to_lowercase();

    if contains_any(&category, APPAREL_KEYWORDS) {
        return Domain::ApparelOrPersonalCare;
    }

    if contains_any(&category, FOOD_KEYWORDS) {
        return Domain::Food;
    }

    Domain::Other
}

/// The food heuristic: organic or fair-trade brands versus everything else.
pub fn food_status(brand: &str) -> &'static str {
    if contains_any(&brand.to_lowercase(), FRIENDLY_BRAND_KEYWORDS) {
        FRIENDLY_FOOD_STATUS
    } else {
        STANDARD_FOOD_STATUS
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}
