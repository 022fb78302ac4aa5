// Data models: rows of the phrase store.
//
// Kept apart from the queries so the rest of the crate can use them without
// depending on rusqlite directly.

use serde::{Deserialize, Serialize};

/// Where a stored phrase came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseSource {
    /// Shipped with pyx and written by `pyx seed`.
    Builtin,
    /// Labeled or overridden by an operator.
    User,
    /// Bulk-imported from a JSON file.
    Import,
}

impl PhraseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhraseSource::Builtin => "builtin",
            PhraseSource::User => "user",
            PhraseSource::Import => "import",
        }
    }

    /// Parse a stored source name. Unknown values are treated as user input.
    pub fn parse(value: &str) -> Self {
        match value {
            "builtin" => PhraseSource::Builtin,
            "import" => PhraseSource::Import,
            _ => PhraseSource::User,
        }
    }
}

impl std::fmt::Display for PhraseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A phrase as stored, with bookkeeping columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPhrase {
    pub text: String,
    pub safe: bool,
    pub category: String,
    pub source: PhraseSource,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_round_trip() {
        for source in [PhraseSource::Builtin, PhraseSource::User, PhraseSource::Import] {
            assert_eq!(PhraseSource::parse(source.as_str()), source);
            assert_eq!(source.to_string(), source.as_str());
        }
        assert_eq!(PhraseSource::parse("firestore"), PhraseSource::User);
    }
}
