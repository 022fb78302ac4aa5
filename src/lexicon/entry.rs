// Lexicon entries: the labeled phrases the scorer matches against.

use serde::{Deserialize, Serialize};

/// Category used when a phrase record carries none.
pub const DEFAULT_CATEGORY: &str = "phrases";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A single labeled phrase.
///
/// `safe = false` marks text that should raise the severity score;
/// `safe = true` marks allow-listed phrasing that pulls it back down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub text: String,
    pub safe: bool,
    #[serde(default = "default_category")]
    pub category: String,
}

impl LexiconEntry {
    pub fn new(text: impl Into<String>, safe: bool, category: impl Into<String>) -> Self {
        let category = category.into();
        Self {
            text: text.into(),
            safe,
            category: if category.trim().is_empty() {
                default_category()
            } else {
                category
            },
        }
    }

    /// Shorthand for a disallowed phrase.
    pub fn unsafe_phrase(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self::new(text, false, category)
    }

    /// Shorthand for an allow-listed phrase.
    pub fn safe_phrase(text: impl Into<String>) -> Self {
        Self::new(text, true, DEFAULT_CATEGORY)
    }
}
