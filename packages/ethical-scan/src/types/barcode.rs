//! The decoded symbol payload that keys a resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// A decoded barcode: a non-empty string of ASCII digits.
///
/// Construction always goes through [`Barcode::parse`], so every value in the
/// pipeline is known to be safe to splice into provider URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    /// Parse a decoder payload, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScanError::InvalidBarcode {
                value: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Barcode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Barcode {
    type Error = ScanError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Barcode> for String {
    fn from(barcode: Barcode) -> Self {
        barcode.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_digits() {
        let barcode = Barcode::parse("3017620422003").unwrap();
        assert_eq!(barcode.as_str(), "3017620422003");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let barcode = Barcode::parse("  0123456789012\n").unwrap();
        assert_eq!(barcode.to_string(), "0123456789012");
    }

    #[test]
    fn test_parse_rejects_empty_and_non_digits() {
        assert!(matches!(
            Barcode::parse(""),
            Err(ScanError::InvalidBarcode { .. })
        ));
        assert!(Barcode::parse("   ").is_err());
        assert!(Barcode::parse("12345abc").is_err());
        assert!(Barcode::parse("123 456").is_err());
        assert!(Barcode::parse("../etc/passwd").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Barcode = serde_json::from_str("\"5000159484695\"").unwrap();
        assert_eq!(ok.as_str(), "5000159484695");

        let bad: std::result::Result<Barcode, _> = serde_json::from_str("\"not-a-code\"");
        assert!(bad.is_err());
    }
}
