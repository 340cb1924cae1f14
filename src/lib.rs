#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::uninlined_format_args
)]

//! Per-session reply memory and prompt templates for agent runtimes.
//!
//! [`sessions`] keeps an exact-match `task -> reply` cache and a truncated
//! last-reply snippet per session id. [`prompts`] loads `<name>.md` templates
//! and fills in `{placeholder}` values.

pub mod config;
pub mod logging;
pub mod prompts;
pub mod sessions;

pub use config::Config;
pub use prompts::{PromptError, PromptLoader, PromptVars};
pub use sessions::{
    global_session_store, normalize_task, InMemorySessionStore, SessionHandle, SessionMemory,
    SessionStore,
};
