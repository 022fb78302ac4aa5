// Pyx: lexicon-based chat moderation.
//
// This is the library root. Transports (HTTP servers, serverless handlers,
// the CLI) call into `moderator::Moderator`; everything below it is pure
// scoring logic plus the phrase store the lexicon is loaded from.

pub mod censor;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod lexicon;
pub mod moderator;
pub mod output;
pub mod request;
pub mod scoring;
pub mod status;

pub use error::{LexiconLoadError, ValidationError};
pub use moderator::Moderator;
pub use request::Verdict;
