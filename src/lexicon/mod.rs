// Lexicon: labeled phrases, their normalized keys, and immutable snapshots.

pub mod builtin;
pub mod entry;
pub mod normalize;
pub mod snapshot;

pub use entry::{LexiconEntry, DEFAULT_CATEGORY};
pub use snapshot::{LexiconSnapshot, PhraseMatch};
