// Per-session conversation history.

use std::collections::VecDeque;

/// How many messages a session remembers.
pub const HISTORY_LIMIT: usize = 10;

/// How many of the most recent messages are used to detect context.
pub const CONTEXT_WINDOW: usize = 5;

/// The last few messages of one conversation, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: VecDeque<String>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    /// Append a message, dropping the oldest once the limit is exceeded.
    pub fn push(&mut self, text: &str) {
        while self.messages.len() >= HISTORY_LIMIT {
            self.messages.pop_front();
        }
        self.messages.push_back(text.to_string());
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All remembered messages, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// The last `CONTEXT_WINDOW` messages joined with spaces and lowercased.
    pub fn context_string(&self) -> String {
        let skip = self.messages.len().saturating_sub(CONTEXT_WINDOW);
        self.messages
            .iter()
            .skip(skip)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}
