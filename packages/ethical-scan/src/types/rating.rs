//! Records from the local brand rating dataset.

use serde::{Deserialize, Deserializer, Serialize};

/// One brand's ethics rating as stored in the dataset.
///
/// On disk: `{ "rating": "Good", "comment": "Uses some eco-friendly materials" }`.
/// `rating` may also be a bare number; `comment` may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRating {
    #[serde(deserialize_with = "text_or_number")]
    pub rating: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl BrandRating {
    pub fn new(rating: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            rating: rating.into(),
            comment: Some(comment.into()),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_rating_is_accepted() {
        let rating: BrandRating = serde_json::from_str(r#"{"rating": 4, "comment": "ok"}"#).unwrap();
        assert_eq!(rating.rating, "4");
    }

    #[test]
    fn test_comment_is_optional() {
        let rating: BrandRating = serde_json::from_str(r#"{"rating": "Not good enough"}"#).unwrap();
        assert_eq!(rating.rating, "Not good enough");
        assert!(rating.comment.is_none());
    }
}
