// Typed errors that callers need to tell apart.
//
// Everything else in the crate uses anyhow. These two exist because a
// transport has to map validation failures onto status codes, and startup
// has to recognize a lexicon failure as fatal.

use thiserror::Error;

/// Rejected input. Always a deterministic rejection, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing \"text\" in body")]
    MissingText,

    #[error("\"text\" must be a string")]
    NotText,

    #[error("Text too long")]
    TooLong { len: usize, max: usize },
}

impl ValidationError {
    /// The HTTP status a transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ValidationError::MissingText | ValidationError::NotText => 400,
            ValidationError::TooLong { .. } => 413,
        }
    }
}

/// The phrase source could not produce a usable lexicon.
///
/// Fatal at startup: serving with an empty lexicon would pass everything.
#[derive(Debug, Error)]
pub enum LexiconLoadError {
    #[error("Failed to read phrases from the phrase store")]
    Source(#[source] anyhow::Error),

    #[error("Phrase store returned no phrases. Run `pyx seed` to load the built-in list.")]
    Empty,

    #[error("Failed to build the lexicon snapshot")]
    Build(#[source] anyhow::Error),
}
