//! Session registry trait and shared handle type.

use parking_lot::Mutex;
use std::sync::Arc;

use super::memory::SessionMemory;

/// Shared, lockable handle to one session's memory.
///
/// Every `get` for the same id returns a clone of the same `Arc`, so
/// `Arc::ptr_eq` holds between them until the session is cleared.
pub type SessionHandle = Arc<Mutex<SessionMemory>>;

/// Registry mapping session ids to their [`SessionMemory`].
pub trait SessionStore: Send + Sync {
    /// Return the session for `session_id`, creating an empty one if absent.
    fn get(&self, session_id: &str) -> SessionHandle;

    /// Whether a session is registered. Never creates one.
    fn has(&self, session_id: &str) -> bool;

    /// Remove a session. Returns `true` if one was removed.
    fn clear(&self, session_id: &str) -> bool;

    /// Remove every session, returning how many there were.
    fn clear_all(&self) -> usize;

    /// Number of registered sessions.
    fn session_count(&self) -> usize;

    /// Ids of all registered sessions, sorted.
    fn session_ids(&self) -> Vec<String>;

    /// The name of this store implementation.
    fn name(&self) -> &str;
}
