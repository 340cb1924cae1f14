//! In-memory session store implementation.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::memory::{SessionMemory, DEFAULT_MAX_LAST_REPLY_LENGTH};
use super::traits::{SessionHandle, SessionStore};

static GLOBAL_SESSION_STORE: OnceLock<InMemorySessionStore> = OnceLock::new();

/// Process-wide session store, created on first use and kept until exit.
///
/// Prefer constructing an [`InMemorySessionStore`] and passing it around;
/// this accessor exists for collaborators that have no context object.
pub fn global_session_store() -> &'static InMemorySessionStore {
    GLOBAL_SESSION_STORE.get_or_init(InMemorySessionStore::new)
}

/// An in-memory session store backed by a mutex-protected hash map.
///
/// The single lock makes get-or-create atomic, so concurrent callers never
/// see two memories for one id. Sessions live until cleared or process exit.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionHandle>>,
    max_last_reply_length: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_max_last_reply_length(DEFAULT_MAX_LAST_REPLY_LENGTH)
    }

    /// Store whose newly created sessions truncate `last_reply` at `max_len`.
    pub fn with_max_last_reply_length(max_len: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_last_reply_length: max_len,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str) -> SessionHandle {
        let mut sessions = self.sessions.lock();
        if let Some(existing) = sessions.get(session_id) {
            return Arc::clone(existing);
        }

        let memory =
            SessionMemory::with_max_last_reply_length(session_id, self.max_last_reply_length);
        let handle = Arc::new(Mutex::new(memory));
        sessions.insert(session_id.to_string(), Arc::clone(&handle));
        tracing::debug!(session_id, total = sessions.len(), "created session");
        handle
    }

    fn has(&self, session_id: &str) -> bool {
        self.sessions.lock().contains_key(session_id)
    }

    fn clear(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().remove(session_id).is_some();
        if removed {
            tracing::info!(session_id, "cleared session");
        }
        removed
    }

    fn clear_all(&self) -> usize {
        let mut sessions = self.sessions.lock();
        let count = sessions.len();
        sessions.clear();
        drop(sessions);

        tracing::info!(count, "cleared all sessions");
        count
    }

    fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}
