//! Session management: per-session reply caches and the registry that owns them.

pub mod in_memory;
pub mod memory;
pub mod normalize;
pub mod traits;

pub use in_memory::{global_session_store, InMemorySessionStore};
pub use memory::{SessionMemory, DEFAULT_MAX_LAST_REPLY_LENGTH, TRUNCATION_MARKER};
pub use normalize::normalize_task;
pub use traits::{SessionHandle, SessionStore};

/// Create a default in-memory session store.
pub fn create_session_store() -> Box<dyn SessionStore> {
    Box::new(InMemorySessionStore::new())
}
