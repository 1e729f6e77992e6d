//! Search results returned by the ethical-index provider.

use serde::{Deserialize, Serialize};

/// The first organic result of a site search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// Title and link as one line of finding text.
    pub fn summary(&self) -> String {
        format!("{} ({})", self.title, self.link)
    }
}
