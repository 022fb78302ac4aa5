// MemoryPhraseStore: in-process phrase store.
//
// Used by tests, and by the `pyx` binary when built without the `sqlite`
// feature (seeded with the built-in phrases). Same upsert semantics as the
// SQLite backend: one row per normalized phrase, and a rewrite moves the
// phrase to the end of the load order.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::models::{PhraseSource, StoredPhrase};
use super::traits::PhraseStore;
use crate::lexicon::normalize::normalize_phrase;
use crate::lexicon::LexiconEntry;

#[derive(Default)]
pub struct MemoryPhraseStore {
    rows: Mutex<Vec<(String, StoredPhrase)>>,
}

impl MemoryPhraseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn upsert(rows: &mut Vec<(String, StoredPhrase)>, entry: &LexiconEntry, source: PhraseSource) -> Result<()> {
        let key = normalize_phrase(&entry.text);
        if key.is_empty() {
            anyhow::bail!("Phrase {:?} has no word characters", entry.text);
        }
        rows.retain(|(k, _)| *k != key);
        rows.push((
            key,
            StoredPhrase {
                text: entry.text.clone(),
                safe: entry.safe,
                category: entry.category.clone(),
                source,
                updated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            },
        ));
        Ok(())
    }
}

#[async_trait]
impl PhraseStore for MemoryPhraseStore {
    async fn load_phrases(&self) -> Result<Vec<LexiconEntry>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .map(|(_, p)| LexiconEntry::new(p.text.clone(), p.safe, p.category.clone()))
            .collect())
    }

    async fn save_phrase(&self, entry: &LexiconEntry, source: PhraseSource) -> Result<()> {
        let mut rows = self.rows.lock().await;
        Self::upsert(&mut rows, entry, source)
    }

    async fn seed(&self, entries: &[LexiconEntry], source: PhraseSource) -> Result<usize> {
        let mut rows = self.rows.lock().await;
        let mut written = 0;
        for entry in entries {
            if Self::upsert(&mut rows, entry, source).is_ok() {
                written += 1;
            }
        }
        Ok(written)
    }

    async fn phrase_count(&self) -> Result<i64> {
        Ok(self.rows.lock().await.len() as i64)
    }

    async fn recent_phrases(&self, limit: u32) -> Result<Vec<StoredPhrase>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .rev()
            .take(limit as usize)
            .map(|(_, p)| p.clone())
            .collect())
    }
}
