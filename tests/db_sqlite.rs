// SQLite phrase store tests.
//
// Uses in-memory databases, so no files are left behind.

#![cfg(feature = "sqlite")]

use pyx::db::schema::create_tables;
use pyx::db::sqlite::SqliteDatabase;
use pyx::db::{PhraseSource, PhraseStore};
use pyx::lexicon::LexiconEntry;
use pyx::scoring::Threshold;
use pyx::Moderator;
use rusqlite::Connection;

fn store() -> SqliteDatabase {
    let conn = Connection::open_in_memory().unwrap();
    create_tables(&conn).unwrap();
    SqliteDatabase::new(conn)
}

#[tokio::test]
async fn seed_and_load_round_trip() {
    let db = store();
    let builtin = pyx::lexicon::builtin::phrases();
    let written = db.seed(&builtin, PhraseSource::Builtin).await.unwrap();
    assert_eq!(written, builtin.len());
    assert_eq!(db.phrase_count().await.unwrap(), builtin.len() as i64);
    assert_eq!(db.load_phrases().await.unwrap().len(), builtin.len());
}

#[tokio::test]
async fn override_wins_on_load() {
    let db = store();
    db.save_phrase(&LexiconEntry::unsafe_phrase("noob", "insults"), PhraseSource::Builtin)
        .await
        .unwrap();
    db.save_phrase(&LexiconEntry::safe_phrase("Noob"), PhraseSource::User)
        .await
        .unwrap();

    let phrases = db.load_phrases().await.unwrap();
    assert_eq!(phrases.len(), 1);
    assert!(phrases[0].safe);

    let recent = db.recent_phrases(10).await.unwrap();
    assert_eq!(recent[0].source, PhraseSource::User);
}

#[tokio::test]
async fn moderator_loads_from_sqlite_and_learns() {
    let db = store();
    db.seed(
        &[LexiconEntry::unsafe_phrase("slur123", "slurs")],
        PhraseSource::Import,
    )
    .await
    .unwrap();

    let m = Moderator::from_store(&db, Threshold::default(), 10)
        .await
        .unwrap();
    assert!(m.evaluate("slur123").bad);

    m.learn(LexiconEntry::unsafe_phrase("noob", "insults"), &db)
        .await
        .unwrap();
    assert_eq!(db.phrase_count().await.unwrap(), 2);

    // A fresh moderator built from the store sees the learned phrase
    let fresh = Moderator::from_store(&db, Threshold::default(), 10)
        .await
        .unwrap();
    assert!(fresh.score("noob") > 0.0);
}

#[test]
fn initialize_creates_schema() {
    let conn = pyx::db::initialize(":memory:").unwrap();
    assert_eq!(pyx::db::schema::table_count(&conn).unwrap(), 2);
}
