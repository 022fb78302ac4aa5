// SessionStore: bounded, concurrent map of session id -> conversation history.
//
// The map itself is a DashMap, so lookups for different sessions only contend
// on a shard lock for the duration of the lookup. Each session's history sits
// behind its own Mutex, so calls for the same session are serialized while
// calls for different sessions run in parallel.
//
// When the store is full, the least-recently-used session is evicted. Losing
// old context is acceptable; failing a scoring call is not.
//
// Finding the LRU victim scans every shard, so a new session arriving at a
// full store costs O(sessions). Calls for sessions already in the store never
// scan. An eviction can race with a call that already holds the evicted
// entry; `with_session` re-checks the map after locking and retries on a
// fresh entry, so no append lands in a history the map no longer points to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use tracing::debug;

use super::history::ConversationHistory;

/// Default number of sessions tracked before eviction kicks in.
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

struct SessionEntry {
    history: Mutex<ConversationHistory>,
    /// Logical clock value of the last access, for LRU eviction.
    last_used: AtomicU64,
}

impl SessionEntry {
    fn new(tick: u64) -> Self {
        Self {
            history: Mutex::new(ConversationHistory::new()),
            last_used: AtomicU64::new(tick),
        }
    }
}

/// Thread-safe session store with a capacity bound and LRU eviction.
pub struct SessionStore {
    sessions: DashMap<String, Arc<SessionEntry>>,
    capacity: usize,
    clock: AtomicU64,
}

impl SessionStore {
    /// Create a store that tracks at most `capacity` sessions (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            capacity: capacity.max(1),
            clock: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of sessions currently tracked.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, session: &str) -> bool {
        self.sessions.contains_key(session)
    }

    /// Run `f` with exclusive access to a session's history, creating the
    /// session (and evicting the LRU one if needed) when it doesn't exist.
    pub fn with_session<R>(&self, session: &str, f: impl FnOnce(&mut ConversationHistory) -> R) -> R {
        loop {
            let entry = self.entry(session);
            let mut history = entry
                .history
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if self.is_current(session, &entry) {
                return f(&mut history);
            }
            debug!(session = %session, "Session evicted while waiting, retrying");
        }
    }

    /// A copy of a session's messages, oldest first. Does not count as a use.
    pub fn history(&self, session: &str) -> Option<Vec<String>> {
        let entry = self.sessions.get(session).map(|e| Arc::clone(e.value()))?;
        let history = entry
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Some(history.messages().map(str::to_string).collect())
    }

    /// Forget a session. Returns true if it existed.
    pub fn remove(&self, session: &str) -> bool {
        self.sessions.remove(session).is_some()
    }

    /// Whether the map still holds `entry` for `session`.
    fn is_current(&self, session: &str, entry: &Arc<SessionEntry>) -> bool {
        self.sessions
            .get(session)
            .is_some_and(|current| Arc::ptr_eq(current.value(), entry))
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn entry(&self, session: &str) -> Arc<SessionEntry> {
        let tick = self.tick();

        // The shard guard from `get` must be released before any call that
        // iterates or removes, or DashMap will deadlock on itself.
        if let Some(existing) = self.sessions.get(session) {
            existing.last_used.store(tick, Ordering::Relaxed);
            return Arc::clone(existing.value());
        }

        let entry = Arc::clone(
            self.sessions
                .entry(session.to_string())
                .or_insert_with(|| Arc::new(SessionEntry::new(tick)))
                .value(),
        );
        entry.last_used.store(tick, Ordering::Relaxed);

        while self.sessions.len() > self.capacity {
            if !self.evict_lru(session) {
                break;
            }
        }

        entry
    }

    /// Evict the least-recently-used session other than `keep`.
    fn evict_lru(&self, keep: &str) -> bool {
        let victim = self
            .sessions
            .iter()
            .filter(|e| e.key() != keep)
            .min_by_key(|e| e.value().last_used.load(Ordering::Relaxed))
            .map(|e| e.key().clone());

        match victim {
            Some(key) => {
                self.sessions.remove(&key);
                debug!(session = %key, capacity = self.capacity, "Evicted least-recently-used session");
                true
            }
            None => false,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_CAPACITY)
    }
}
