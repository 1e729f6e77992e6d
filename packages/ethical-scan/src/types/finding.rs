//! Labelled ethical-assessment text attributed to one source.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::traits::provider::ProviderId;

/// Finding labels emitted by the pipeline.
pub mod labels {
    pub const RATING: &str = "Rating";
    pub const COMMENT: &str = "Comment";
    pub const STATUS: &str = "Status";
    pub const TOP_MATCH: &str = "Top Match";
    pub const SNIPPET: &str = "Snippet";
}

/// An ordered label → text mapping from exactly one source.
///
/// Insertion order is meaningful: the first entry is the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthicalFinding {
    source: ProviderId,
    entries: IndexMap<String, String>,
}

impl EthicalFinding {
    pub fn new(source: ProviderId) -> Self {
        Self {
            source,
            entries: IndexMap::new(),
        }
    }

    /// Append an entry. Re-using a label replaces its text but keeps its position.
    pub fn with_entry(mut self, label: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(label.into(), text.into());
        self
    }

    pub fn source(&self) -> ProviderId {
        self.source
    }

    pub fn entries(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// The first (primary) entry.
    pub fn primary(&self) -> Option<(&str, &str)> {
        self.entries
            .first()
            .map(|(label, text)| (label.as_str(), text.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as owned pairs, in order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(label, text)| (label.clone(), text.clone()))
            .collect()
    }
}
