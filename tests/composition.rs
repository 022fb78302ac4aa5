// Composition tests: the full flow through the Moderator:
//   validate -> score -> (context) -> decide -> censor -> Verdict
// without any network or filesystem side effects.

use serde_json::json;

use pyx::db::{MemoryPhraseStore, PhraseSource, PhraseStore};
use pyx::lexicon::{LexiconEntry, LexiconSnapshot};
use pyx::request::{validate, Verdict, MAX_TEXT_CHARS};
use pyx::scoring::Threshold;
use pyx::{LexiconLoadError, Moderator, ValidationError};

fn lexicon() -> LexiconSnapshot {
    LexiconSnapshot::build(
        1,
        vec![
            LexiconEntry::unsafe_phrase("slur123", "slurs"),
            LexiconEntry::unsafe_phrase("died", "violence"),
            LexiconEntry::safe_phrase("good game"),
        ],
    )
    .unwrap()
}

fn moderator() -> Moderator {
    Moderator::new(lexicon(), Threshold::default(), 100)
}

// ============================================================
// End-to-end scenarios
// ============================================================

#[test]
fn clean_text_passes_through() {
    let m = moderator();
    let score = m.score("hello world");
    assert_eq!(score, 0.0);
    assert!(!m.is_bad(score));

    let verdict = m.evaluate("hello world");
    assert_eq!(
        verdict,
        Verdict {
            score: 0.0,
            bad: false,
            censored: "hello world".to_string()
        }
    );
}

#[test]
fn slur_is_flagged_and_masked() {
    let m = moderator();
    let input = "you are a slur123";
    let verdict = m.evaluate(input);
    assert!(verdict.bad);
    assert_eq!(verdict.censored, "you are a *******");
    assert_eq!(verdict.censored.chars().count(), input.chars().count());
}

#[test]
fn gaming_session_lowers_score() {
    let m = moderator();
    let fresh = m.score("I died at the boss fight");
    m.evaluate_with_context("s1", "playing roblox");
    let verdict = m.evaluate_with_context("s1", "I died at the boss fight");
    assert!(verdict.score < fresh, "Expected {} < {fresh}", verdict.score);
    assert!(!verdict.bad);
}

#[test]
fn verdict_json_shape() {
    let verdict = moderator().evaluate("slur123");
    let value = serde_json::to_value(&verdict).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 3);
    assert!(obj["score"].is_f64());
    assert_eq!(obj["bad"], json!(true));
    assert_eq!(obj["censored"], json!("*******"));
    // 1 - e^-3 = 0.950213 -> 0.9502
    assert_eq!(obj["score"], json!(0.9502));
}

#[test]
fn threshold_is_runtime_configuration() {
    let strict = Moderator::new(lexicon(), Threshold::new(0.99).unwrap(), 10);
    assert!(!strict.evaluate("slur123").bad);

    let lenient = Moderator::new(lexicon(), Threshold::new(0.1).unwrap(), 10);
    assert!(lenient.evaluate("I died").bad);
}

// ============================================================
// Validation ahead of scoring
// ============================================================

#[test]
fn validation_rejections() {
    assert_eq!(validate(&json!({}), MAX_TEXT_CHARS), Err(ValidationError::MissingText));
    assert_eq!(
        validate(&json!({"text": 5}), MAX_TEXT_CHARS),
        Err(ValidationError::NotText)
    );

    let long = "a".repeat(MAX_TEXT_CHARS + 1);
    let err = validate(&json!({ "text": long }), MAX_TEXT_CHARS).unwrap_err();
    assert_eq!(err.status_code(), 413);
}

#[test]
fn text_at_limit_is_scored() {
    let text = "a".repeat(MAX_TEXT_CHARS);
    let body = json!({ "text": text });
    let text = validate(&body, MAX_TEXT_CHARS).unwrap();
    assert_eq!(moderator().score(text), 0.0);
}

// ============================================================
// Lexicon lifecycle
// ============================================================

#[tokio::test]
async fn startup_refuses_empty_store() {
    let store = MemoryPhraseStore::new();
    let err = Moderator::from_store(&store, Threshold::default(), 10)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, LexiconLoadError::Empty));
}

#[tokio::test]
async fn startup_from_seeded_store() {
    let store = MemoryPhraseStore::new();
    store
        .seed(&pyx::lexicon::builtin::phrases(), PhraseSource::Builtin)
        .await
        .unwrap();

    let m = Moderator::from_store(&store, Threshold::default(), 10)
        .await
        .unwrap();
    assert_eq!(m.lexicon().version(), 1);
    assert!(m.evaluate("kill yourself").bad);
    assert!(!m.evaluate("good game, well played").bad);
}

#[tokio::test]
async fn reload_swaps_snapshot_but_old_handle_survives() {
    let m = moderator();
    let old = m.lexicon();

    let store = MemoryPhraseStore::new();
    store
        .save_phrase(&LexiconEntry::unsafe_phrase("noob", "insults"), PhraseSource::User)
        .await
        .unwrap();
    let version = m.reload_from(&store).await.unwrap();

    assert_eq!(version, 2);
    assert_eq!(m.lexicon().len(), 1);
    // A caller holding the old snapshot still sees it intact
    assert_eq!(old.len(), 3);
    assert!(old.get("slur123").is_some());
}

#[tokio::test]
async fn failed_reload_keeps_live_snapshot() {
    let m = moderator();
    let store = MemoryPhraseStore::new();
    assert!(m.reload_from(&store).await.is_err());
    assert_eq!(m.lexicon().version(), 1);
    assert!(m.evaluate("slur123").bad);
}

struct BrokenStore;

#[async_trait::async_trait]
impl PhraseStore for BrokenStore {
    async fn load_phrases(&self) -> anyhow::Result<Vec<LexiconEntry>> {
        anyhow::bail!("store offline")
    }
    async fn save_phrase(&self, _entry: &LexiconEntry, _source: PhraseSource) -> anyhow::Result<()> {
        anyhow::bail!("store offline")
    }
    async fn seed(&self, _entries: &[LexiconEntry], _source: PhraseSource) -> anyhow::Result<usize> {
        anyhow::bail!("store offline")
    }
    async fn phrase_count(&self) -> anyhow::Result<i64> {
        anyhow::bail!("store offline")
    }
    async fn recent_phrases(&self, _limit: u32) -> anyhow::Result<Vec<pyx::db::StoredPhrase>> {
        anyhow::bail!("store offline")
    }
}

#[tokio::test]
async fn unreachable_store_is_fatal_at_startup() {
    let err = Moderator::from_store(&BrokenStore, Threshold::default(), 10)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, LexiconLoadError::Source(_)));

    // The store's own error stays reachable as the source
    let source = std::error::Error::source(&err).map(|e| e.to_string());
    assert_eq!(source.as_deref(), Some("store offline"));
    let report = format!("{:#}", anyhow::Error::from(err));
    assert!(report.contains("store offline"), "Got {report}");
}

#[tokio::test]
async fn learn_survives_persistence_failure() {
    let m = moderator();
    let version = m
        .learn(LexiconEntry::unsafe_phrase("noob", "insults"), &BrokenStore)
        .await
        .unwrap();
    assert_eq!(version, 2);
    assert!(m.score("noob") > 0.0);
    assert!(m.evaluate("slur123").bad);
}

/// Memory store whose writes yield to the runtime first, so a concurrent
/// reader can run between a learn's swap and its write.
struct YieldingStore(MemoryPhraseStore);

#[async_trait::async_trait]
impl PhraseStore for YieldingStore {
    async fn load_phrases(&self) -> anyhow::Result<Vec<LexiconEntry>> {
        self.0.load_phrases().await
    }
    async fn save_phrase(&self, entry: &LexiconEntry, source: PhraseSource) -> anyhow::Result<()> {
        tokio::task::yield_now().await;
        self.0.save_phrase(entry, source).await
    }
    async fn seed(&self, entries: &[LexiconEntry], source: PhraseSource) -> anyhow::Result<usize> {
        self.0.seed(entries, source).await
    }
    async fn phrase_count(&self) -> anyhow::Result<i64> {
        self.0.phrase_count().await
    }
    async fn recent_phrases(&self, limit: u32) -> anyhow::Result<Vec<pyx::db::StoredPhrase>> {
        self.0.recent_phrases(limit).await
    }
}

#[tokio::test]
async fn interleaved_learn_and_reload_keep_the_learned_phrase() {
    let store = YieldingStore(MemoryPhraseStore::new());
    store
        .seed(&[LexiconEntry::unsafe_phrase("slur123", "slurs")], PhraseSource::Builtin)
        .await
        .unwrap();
    let m = Moderator::from_store(&store, Threshold::default(), 10)
        .await
        .unwrap();

    let (learned, reloaded) = tokio::join!(
        m.learn(LexiconEntry::unsafe_phrase("noob", "insults"), &store),
        m.reload_from(&store),
    );
    let learned = learned.unwrap();
    let reloaded = reloaded.unwrap();

    assert_ne!(learned, reloaded, "Two writers produced the same version");
    assert_eq!(m.lexicon().version(), learned.max(reloaded));
    assert_eq!(m.lexicon().version(), 3);
    assert!(m.score("noob") > 0.0, "Reload dropped the learned phrase");
    assert!(m.evaluate("slur123").bad);
}
