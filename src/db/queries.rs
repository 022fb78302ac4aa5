// Database queries: CRUD operations for the phrase store.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::Result;
use rusqlite::{params, Connection};

use super::models::{PhraseSource, StoredPhrase};
use crate::lexicon::normalize::normalize_phrase;
use crate::lexicon::LexiconEntry;

/// Load every phrase, oldest write first, so later writes win when the
/// lexicon is built.
pub fn load_phrases(conn: &Connection) -> Result<Vec<LexiconEntry>> {
    let mut stmt = conn.prepare(
        "SELECT text, safe, category FROM phrases
         ORDER BY updated_at ASC, id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(LexiconEntry::new(
            row.get::<_, String>(0)?,
            row.get::<_, bool>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut phrases = Vec::new();
    for row in rows {
        phrases.push(row?);
    }
    Ok(phrases)
}

/// Insert or replace a phrase, keyed by its normalized text.
pub fn upsert_phrase(conn: &Connection, entry: &LexiconEntry, source: PhraseSource) -> Result<()> {
    let key = normalize_phrase(&entry.text);
    if key.is_empty() {
        anyhow::bail!("Phrase {:?} has no word characters", entry.text);
    }

    conn.execute(
        "INSERT INTO phrases (phrase_key, text, safe, category, source, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, strftime('%Y-%m-%d %H:%M:%f', 'now'))
         ON CONFLICT(phrase_key) DO UPDATE SET
            text = ?2,
            safe = ?3,
            category = ?4,
            source = ?5,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')",
        params![key, entry.text, entry.safe, entry.category, source.as_str()],
    )?;
    Ok(())
}

/// Upsert many phrases in one transaction. Returns the number written.
pub fn upsert_phrases(
    conn: &mut Connection,
    entries: &[LexiconEntry],
    source: PhraseSource,
) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut written = 0;
    for entry in entries {
        if normalize_phrase(&entry.text).is_empty() {
            continue;
        }
        upsert_phrase(&tx, entry, source)?;
        written += 1;
    }
    tx.commit()?;
    Ok(written)
}

/// Total number of stored phrases.
pub fn phrase_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM phrases", [], |row| row.get(0))?;
    Ok(count)
}

/// The most recently written phrases, newest first.
pub fn recent_phrases(conn: &Connection, limit: u32) -> Result<Vec<StoredPhrase>> {
    let mut stmt = conn.prepare(
        "SELECT text, safe, category, source, updated_at FROM phrases
         ORDER BY updated_at DESC, id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        let source: String = row.get(3)?;
        Ok(StoredPhrase {
            text: row.get(0)?,
            safe: row.get(1)?,
            category: row.get(2)?,
            source: PhraseSource::parse(&source),
            updated_at: row.get(4)?,
        })
    })?;

    let mut phrases = Vec::new();
    for row in rows {
        phrases.push(row?);
    }
    Ok(phrases)
}
