//! Per-session reply cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default number of characters kept in [`SessionMemory::last_reply`].
pub const DEFAULT_MAX_LAST_REPLY_LENGTH: usize = 200;

/// Marker appended to `last_reply` when the stored reply was truncated.
pub const TRUNCATION_MARKER: &str = "...";

fn default_max_last_reply_length() -> usize {
    DEFAULT_MAX_LAST_REPLY_LENGTH
}

/// Lightweight memory for one conversation session.
///
/// Holds an exact-match `normalized_task -> reply` cache, so repeated tasks
/// skip the model call, plus a short snippet of the most recent reply that
/// planners can feed back in as minimal prompt continuity.
///
/// Keys are compared byte-for-byte. Callers normalize task text themselves
/// (see [`normalize_task`](super::normalize_task)) before every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMemory {
    session_id: String,
    cache: HashMap<String, String>,
    last_reply: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Runtime setting only; restored to the default when deserialized.
    #[serde(skip, default = "default_max_last_reply_length")]
    max_last_reply_length: usize,
}

impl SessionMemory {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_max_last_reply_length(session_id, DEFAULT_MAX_LAST_REPLY_LENGTH)
    }

    pub fn with_max_last_reply_length(
        session_id: impl Into<String>,
        max_last_reply_length: usize,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            cache: HashMap::new(),
            last_reply: None,
            created_at: now,
            updated_at: now,
            max_last_reply_length,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Truncated snippet of the most recent reply, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.last_reply.as_deref()
    }

    pub fn max_last_reply_length(&self) -> usize {
        self.max_last_reply_length
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Number of cached task entries.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Store the first `max_last_reply_length` characters of `reply`,
    /// appending [`TRUNCATION_MARKER`] when anything was cut.
    ///
    /// Empty or absent replies reset `last_reply` to `None`.
    pub fn set_last_reply(&mut self, reply: Option<&str>) {
        self.last_reply = match reply {
            Some(text) if !text.is_empty() => {
                Some(truncate_reply(text, self.max_last_reply_length))
            }
            _ => None,
        };
        self.touch();
    }

    /// Cache `reply` under `normalized_task` (last write wins) and update
    /// `last_reply` from it.
    pub fn cache_reply(&mut self, normalized_task: impl Into<String>, reply: impl Into<String>) {
        let normalized_task = normalized_task.into();
        let reply = reply.into();
        self.set_last_reply(Some(reply.as_str()));
        let replaced = self.cache.insert(normalized_task, reply).is_some();
        tracing::debug!(
            session_id = %self.session_id,
            replaced,
            entries = self.cache.len(),
            "cached reply"
        );
    }

    /// Exact-match lookup. `None` means the task was never cached.
    pub fn get_cached_reply(&self, normalized_task: &str) -> Option<&str> {
        let hit = self.cache.get(normalized_task).map(String::as_str);
        tracing::debug!(
            session_id = %self.session_id,
            hit = hit.is_some(),
            "cache lookup"
        );
        hit
    }

    pub fn has_cache(&self, normalized_task: &str) -> bool {
        self.cache.contains_key(normalized_task)
    }

    /// Drop every cached entry and the last-reply snippet. Returns the
    /// number of entries removed.
    pub fn clear_cache(&mut self) -> usize {
        let removed = self.cache.len();
        self.cache.clear();
        self.last_reply = None;
        self.touch();
        removed
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Keep at most `max_chars` characters (not bytes) of `text`.
fn truncate_reply(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}
