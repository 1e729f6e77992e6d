//! Typed errors for the resolution pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers and tests can
//! match on exactly which kind of provider failure occurred.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::traits::provider::ProviderId;

/// Errors a single provider call can produce.
///
/// `NotFound` is an expected outcome (the source simply has no record). Every
/// other variant is a transport-class failure: the pipeline records it and
/// advances to the next step.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The source has no record for the query
    #[error("no record found")]
    NotFound,

    /// Network or HTTP-level failure
    #[error("{provider} transport error: {message}")]
    Transport { provider: ProviderId, message: String },

    /// The response did not have the expected shape
    #[error("{provider} returned a malformed response: {message}")]
    MalformedResponse { provider: ProviderId, message: String },

    /// The call exceeded its per-provider bound
    #[error("{provider} timed out after {after:?}")]
    Timeout { provider: ProviderId, after: Duration },
}

impl ProviderError {
    /// Build a transport error from any displayable cause.
    pub fn transport(provider: ProviderId, cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            provider,
            message: cause.to_string(),
        }
    }

    /// Build a malformed-response error from any displayable cause.
    pub fn malformed(provider: ProviderId, cause: impl std::fmt::Display) -> Self {
        Self::MalformedResponse {
            provider,
            message: cause.to_string(),
        }
    }

    /// Whether this is the expected "no record" outcome rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Errors outside individual provider calls: input validation, dataset
/// loading, adapter construction, and caller-initiated cancellation.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Barcode payload was empty or not all digits
    #[error("invalid barcode: {value:?}")]
    InvalidBarcode { value: String },

    /// Brand rating dataset could not be read
    #[error("failed to read brand ratings from {}: {source}", .path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Brand rating dataset is not in the expected shape
    #[error("failed to parse brand ratings: {0}")]
    DatasetParse(#[from] serde_json::Error),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Pipeline was assembled incorrectly
    #[error("config error: {reason}")]
    Config { reason: String },

    /// Caller cancelled the resolution between provider calls
    #[error("resolution cancelled")]
    Cancelled,
}

/// Result type alias for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Result type alias for everything else.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguished_from_failures() {
        assert!(ProviderError::NotFound.is_not_found());
        assert!(!ProviderError::transport(ProviderId::WebSearch, "connection reset").is_not_found());
        assert!(!ProviderError::malformed(ProviderId::ProductCatalog, "expected object").is_not_found());
        assert!(!ProviderError::Timeout {
            provider: ProviderId::EthicalIndex,
            after: Duration::from_secs(12),
        }
        .is_not_found());
    }

    #[test]
    fn test_error_messages_name_the_provider() {
        let err = ProviderError::transport(ProviderId::RetailerDirectory, "HTTP 503");
        assert_eq!(err.to_string(), "Retailer Directory transport error: HTTP 503");

        let err = ProviderError::malformed(ProviderId::ProductCatalog, "missing field");
        assert!(err.to_string().starts_with("Product Catalog returned a malformed response"));
    }

    #[test]
    fn test_dataset_error_shows_path() {
        let err = ScanError::Dataset {
            path: PathBuf::from("/data/goodonyou.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/data/goodonyou.json"));
    }
}
