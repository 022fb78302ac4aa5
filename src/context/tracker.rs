// Context-aware severity adjustment.
//
// Game chat is full of lexically alarming but harmless phrasing ("I died at
// the checkpoint", "respawn and kill the boss"). When a session's recent
// messages look like gaming talk and the current message mentions one of the
// harm-adjacent words, the score is damped. This is a bounded heuristic: it
// only ever lowers a score, and only by a fixed factor.

use tracing::debug;

use super::sessions::SessionStore;

/// Topic keywords that mark a conversation as gaming talk.
/// Matched as substrings of the lowercased context window.
pub const GAMING_KEYWORDS: &[&str] = &[
    "game",
    "minecraft",
    "roblox",
    "fortnite",
    "respawn",
    "restart",
    "level",
    "player",
    "character",
    "play",
    "gaming",
    "stream",
    "boss fight",
    "checkpoint",
    "stuck",
    "lava",
    "spawn",
    "died",
    "health",
    "lives",
];

/// Words that are only alarming outside of a gaming frame.
/// Matched as substrings of the lowercased current message, so "die" also
/// covers "died" and "dies".
pub const HARM_ADJACENT_WORDS: &[&str] = &["die", "kill", "dead", "death", "respawn", "restart"];

/// Multiplier applied to the score when the damping rule fires.
pub const CONTEXT_DAMPING: f64 = 0.4;

/// Whether a lowercased context string looks like gaming talk.
pub fn is_gaming_context(context: &str) -> bool {
    GAMING_KEYWORDS.iter().any(|kw| context.contains(kw))
}

/// Whether a message mentions any harm-adjacent word.
pub fn mentions_harm(text: &str) -> bool {
    let lower = text.to_lowercase();
    HARM_ADJACENT_WORDS.iter().any(|w| lower.contains(w))
}

/// Tracks per-session history and damps scores in a benign gaming context.
#[derive(Default)]
pub struct ContextTracker {
    sessions: SessionStore,
}

impl ContextTracker {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Adjust `base_score` using the session's recent context, then record `text`.
    ///
    /// The current message only affects later calls; its own adjustment is
    /// decided from the history as it stood before this call.
    pub fn adjust(&self, session: &str, base_score: f64, text: &str) -> f64 {
        let base_score = base_score.clamp(0.0, 1.0);

        self.sessions.with_session(session, |history| {
            let damped = is_gaming_context(&history.context_string()) && mentions_harm(text);
            history.push(text);

            if damped {
                debug!(session, base_score, "Damping score in gaming context");
                base_score * CONTEXT_DAMPING
            } else {
                base_score
            }
        })
    }
}
