// PhraseStore trait: backend-agnostic async interface to the phrase source.
//
// Implementors: SqliteDatabase (wraps rusqlite), MemoryPhraseStore.
// All methods are async so both sync (rusqlite via Mutex) and native async
// backends fit behind a single interface.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{PhraseSource, StoredPhrase};
use crate::lexicon::LexiconEntry;

#[async_trait]
pub trait PhraseStore: Send + Sync {
    /// Every stored phrase, oldest write first.
    async fn load_phrases(&self) -> Result<Vec<LexiconEntry>>;

    /// Insert or replace one phrase, keyed by its normalized text.
    async fn save_phrase(&self, entry: &LexiconEntry, source: PhraseSource) -> Result<()>;

    /// Bulk upsert. Returns the number of phrases written.
    async fn seed(&self, entries: &[LexiconEntry], source: PhraseSource) -> Result<usize>;

    /// Total number of stored phrases.
    async fn phrase_count(&self) -> Result<i64>;

    /// The most recently written phrases, newest first.
    async fn recent_phrases(&self, limit: u32) -> Result<Vec<StoredPhrase>>;
}
