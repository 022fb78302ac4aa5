// Moderator: the single entry point transports call.
//
// Data flow for one message:
//   text -> Scorer(lexicon) -> base score
//        -> ContextTracker.adjust(session, ...) -> final score   (session calls only)
//        -> Threshold -> bad
//        -> censor(text) when bad
//
// The lexicon is held as an Arc behind a RwLock. Readers clone the Arc and
// drop the lock immediately, and writers build the next snapshot before taking
// the write guard, so a reload never blocks scoring for longer than a pointer
// swap. A call that started on the old snapshot finishes on it.
//
// Writers (`reload_from`, `learn`) are serialized by a separate async mutex
// held across their store I/O. Versions only ever increase, and a reload that
// follows a learn sees the learned phrase in the store.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::censor;
use crate::context::{ContextTracker, SessionStore};
use crate::db::{PhraseSource, PhraseStore};
use crate::error::LexiconLoadError;
use crate::lexicon::{LexiconEntry, LexiconSnapshot};
use crate::request::Verdict;
use crate::scoring::{ScoreBreakdown, Scorer, ScoringWeights, Threshold};

pub struct Moderator {
    lexicon: RwLock<Arc<LexiconSnapshot>>,
    writer: Mutex<()>,
    scorer: Scorer,
    tracker: ContextTracker,
    threshold: Threshold,
}

impl Moderator {
    /// Build a moderator around an already-built lexicon.
    pub fn new(lexicon: LexiconSnapshot, threshold: Threshold, session_capacity: usize) -> Self {
        Self {
            lexicon: RwLock::new(Arc::new(lexicon)),
            writer: Mutex::new(()),
            scorer: Scorer::default(),
            tracker: ContextTracker::new(SessionStore::new(session_capacity)),
            threshold,
        }
    }

    /// Replace the default scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.scorer = Scorer::new(weights);
        self
    }

    /// Load the lexicon from a phrase store. Fails closed: an unreachable
    /// store or an empty phrase set is an error, never an empty lexicon.
    pub async fn from_store(
        store: &dyn PhraseStore,
        threshold: Threshold,
        session_capacity: usize,
    ) -> Result<Self, LexiconLoadError> {
        let snapshot = load_snapshot(store, 1).await?;
        info!(
            entries = snapshot.len(),
            version = snapshot.version(),
            ban_line = threshold.value(),
            "Lexicon loaded"
        );
        Ok(Self::new(snapshot, threshold, session_capacity))
    }

    /// The snapshot currently in use.
    pub fn lexicon(&self) -> Arc<LexiconSnapshot> {
        Arc::clone(&self.lexicon.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn sessions(&self) -> &SessionStore {
        self.tracker.sessions()
    }

    /// Stateless score.
    pub fn score(&self, text: &str) -> f64 {
        self.scorer.score(text, &self.lexicon())
    }

    /// Stateless score with the phrases that produced it.
    pub fn explain(&self, text: &str) -> ScoreBreakdown {
        self.scorer.explain(text, &self.lexicon())
    }

    /// Session-scoped score. Records `text` in the session's history.
    pub fn score_with_context(&self, session: &str, text: &str) -> f64 {
        let base = self.score(text);
        self.tracker.adjust(session, base, text)
    }

    /// `score >= BAN_LINE`.
    pub fn is_bad(&self, score: f64) -> bool {
        self.threshold.is_bad(score)
    }

    /// Mask unsafe phrases in `text`.
    pub fn censor(&self, text: &str) -> String {
        censor::censor(text, &self.lexicon())
    }

    /// Score, decide, and censor one text without session context.
    pub fn evaluate(&self, text: &str) -> Verdict {
        let lexicon = self.lexicon();
        let score = self.scorer.score(text, &lexicon);
        self.verdict(text, score, &lexicon)
    }

    /// Score, decide, and censor one text within a session.
    pub fn evaluate_with_context(&self, session: &str, text: &str) -> Verdict {
        let lexicon = self.lexicon();
        let base = self.scorer.score(text, &lexicon);
        let score = self.tracker.adjust(session, base, text);
        self.verdict(text, score, &lexicon)
    }

    fn verdict(&self, text: &str, score: f64, lexicon: &LexiconSnapshot) -> Verdict {
        let bad = self.is_bad(score);
        let censored = if bad {
            censor::censor(text, lexicon)
        } else {
            text.to_string()
        };
        Verdict::new(score, bad, censored)
    }

    /// Swap in a new snapshot.
    pub fn reload(&self, snapshot: LexiconSnapshot) {
        self.swap(Arc::new(snapshot));
    }

    fn swap(&self, snapshot: Arc<LexiconSnapshot>) {
        let mut guard = self.lexicon.write().unwrap_or_else(PoisonError::into_inner);
        info!(
            from = guard.version(),
            to = snapshot.version(),
            entries = snapshot.len(),
            "Lexicon reloaded"
        );
        *guard = snapshot;
    }

    /// Rebuild the lexicon from the store. On failure the live snapshot stays.
    pub async fn reload_from(&self, store: &dyn PhraseStore) -> Result<u64, LexiconLoadError> {
        let _writer = self.writer.lock().await;
        let next_version = self.lexicon().version() + 1;
        let snapshot = load_snapshot(store, next_version).await?;
        let version = snapshot.version();
        self.swap(Arc::new(snapshot));
        Ok(version)
    }

    /// Add or override one phrase. The new snapshot goes live immediately;
    /// persisting it is best-effort and a failure is only logged.
    pub async fn learn(&self, entry: LexiconEntry, store: &dyn PhraseStore) -> anyhow::Result<u64> {
        let _writer = self.writer.lock().await;
        let next = self.lexicon().with_entry(entry.clone())?;
        let version = next.version();
        self.swap(Arc::new(next));
        info!(text = %entry.text, safe = entry.safe, category = %entry.category, version, "Learned phrase");

        if let Err(e) = store.save_phrase(&entry, PhraseSource::User).await {
            warn!(error = %e, text = %entry.text, "Failed to persist learned phrase");
        }

        Ok(version)
    }
}

async fn load_snapshot(store: &dyn PhraseStore, version: u64) -> Result<LexiconSnapshot, LexiconLoadError> {
    let phrases = store
        .load_phrases()
        .await
        .map_err(LexiconLoadError::Source)?;

    let snapshot = LexiconSnapshot::build(version, phrases)
        .map_err(LexiconLoadError::Build)?;

    if snapshot.is_empty() {
        return Err(LexiconLoadError::Empty);
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPhraseStore;

    fn moderator() -> Moderator {
        let lexicon = LexiconSnapshot::build(
            1,
            vec![
                LexiconEntry::unsafe_phrase("idiot", "insults"),
                LexiconEntry::unsafe_phrase("died", "violence"),
            ],
        )
        .unwrap();
        Moderator::new(lexicon, Threshold::default(), 100)
    }

    #[test]
    fn test_evaluate_clean_text() {
        let verdict = moderator().evaluate("hello world");
        assert_eq!(verdict.score, 0.0);
        assert!(!verdict.bad);
        assert_eq!(verdict.censored, "hello world");
    }

    #[test]
    fn test_evaluate_bad_text() {
        let verdict = moderator().evaluate("what an IDIOT");
        assert!(verdict.bad);
        assert_eq!(verdict.censored, "what an *****");
    }

    #[test]
    fn test_context_verdict_not_bad_after_damping() {
        let m = moderator();
        assert!(m.evaluate("I died").bad);
        m.evaluate_with_context("s", "minecraft time");
        let verdict = m.evaluate_with_context("s", "I died");
        assert!(!verdict.bad);
        assert_eq!(verdict.censored, "I died");
    }

    #[tokio::test]
    async fn test_from_store_fails_closed_on_empty() {
        let store = MemoryPhraseStore::new();
        let result = Moderator::from_store(&store, Threshold::default(), 10).await;
        assert!(matches!(result, Err(LexiconLoadError::Empty)));
    }

    #[tokio::test]
    async fn test_learn_then_reload() {
        let m = moderator();
        let store = MemoryPhraseStore::new();
        let version = m
            .learn(LexiconEntry::unsafe_phrase("noob", "insults"), &store)
            .await
            .unwrap();
        assert_eq!(version, 2);
        assert!(m.score("noob") > 0.0);
        assert_eq!(store.phrase_count().await.unwrap(), 1);

        // The store only has what was learned, so a reload narrows the lexicon
        let reloaded = m.reload_from(&store).await.unwrap();
        assert_eq!(reloaded, 3);
        assert_eq!(m.score("idiot"), 0.0);
    }
}
