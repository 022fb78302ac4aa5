// SqliteDatabase: rusqlite backend implementing the PhraseStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{PhraseSource, StoredPhrase};
use super::traits::PhraseStore;
use crate::lexicon::LexiconEntry;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Count the number of user-created tables in the database.
    pub async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }
}

#[async_trait]
impl PhraseStore for SqliteDatabase {
    async fn load_phrases(&self) -> Result<Vec<LexiconEntry>> {
        let conn = self.conn.lock().await;
        super::queries::load_phrases(&conn)
    }

    async fn save_phrase(&self, entry: &LexiconEntry, source: PhraseSource) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_phrase(&conn, entry, source)
    }

    async fn seed(&self, entries: &[LexiconEntry], source: PhraseSource) -> Result<usize> {
        let mut conn = self.conn.lock().await;
        super::queries::upsert_phrases(&mut conn, entries, source)
    }

    async fn phrase_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::phrase_count(&conn)
    }

    async fn recent_phrases(&self, limit: u32) -> Result<Vec<StoredPhrase>> {
        let conn = self.conn.lock().await;
        super::queries::recent_phrases(&conn, limit)
    }
}
