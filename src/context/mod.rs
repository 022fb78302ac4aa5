// Conversation context: per-session history and severity damping.

pub mod history;
pub mod sessions;
pub mod tracker;

pub use history::{ConversationHistory, CONTEXT_WINDOW, HISTORY_LIMIT};
pub use sessions::{SessionStore, DEFAULT_SESSION_CAPACITY};
pub use tracker::ContextTracker;
