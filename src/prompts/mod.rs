//! Prompt templates: markdown files with `{placeholder}` substitution.

pub mod error;
pub mod loader;
pub mod template;

pub use error::{PromptError, PromptResult};
pub use loader::{default_prompts_dir, PromptLoader};
pub use template::{placeholders, render_prompt, PromptVars};
