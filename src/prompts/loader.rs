use std::path::{Path, PathBuf};

use super::error::{PromptError, PromptResult};
use super::template::{render_prompt, PromptVars};

/// Extension every prompt template carries on disk.
const PROMPT_EXTENSION: &str = "md";

/// Bundled `prompts/` directory at the crate root.
pub fn default_prompts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts")
}

/// Loads `<name>.md` templates from a single directory and renders them.
#[derive(Debug, Clone)]
pub struct PromptLoader {
    prompts_dir: PathBuf,
}

impl PromptLoader {
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
        }
    }

    pub fn prompts_dir(&self) -> &Path {
        &self.prompts_dir
    }

    /// Path of the template called `name`. Names are bare file stems; anything
    /// that could resolve outside the prompts directory is rejected.
    pub fn template_path(&self, name: &str) -> PromptResult<PathBuf> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(PromptError::InvalidName(name.to_string()));
        }
        Ok(self
            .prompts_dir
            .join(format!("{name}.{PROMPT_EXTENSION}")))
    }

    /// Read the raw template text for `name`.
    pub fn load_prompt(&self, name: &str) -> PromptResult<String> {
        let path = self.template_path(name)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(
                    name,
                    path = %path.display(),
                    bytes = content.len(),
                    "loaded prompt"
                );
                Ok(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PromptError::NotFound {
                name: name.to_string(),
                path,
            }),
            Err(source) => Err(PromptError::Io { path, source }),
        }
    }

    /// Load `name` and substitute `vars` into it.
    pub fn get_prompt(&self, name: &str, vars: &PromptVars) -> PromptResult<String> {
        let template = self.load_prompt(name)?;
        render_prompt(&template, vars)
    }

    /// Names of all templates in the prompts directory, sorted. A missing
    /// directory yields an empty list.
    pub fn available_prompts(&self) -> PromptResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.prompts_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PromptError::Io {
                    path: self.prompts_dir.clone(),
                    source,
                })
            }
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(PROMPT_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::new(default_prompts_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader_with(files: &[(&str, &str)]) -> (TempDir, PromptLoader) {
        let tmp = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(tmp.path().join(name), content).unwrap();
        }
        let loader = PromptLoader::new(tmp.path());
        (tmp, loader)
    }

    #[test]
    fn load_prompt_reads_full_file() {
        let content = "# Planner\nPlan the task: {task}\n";
        let (_tmp, loader) = loader_with(&[("planner.md", content)]);
        assert_eq!(loader.load_prompt("planner").unwrap(), content);
    }

    #[test]
    fn load_prompt_missing_file() {
        let (_tmp, loader) = loader_with(&[]);
        let err = loader.load_prompt("nope").unwrap_err();
        match err {
            PromptError::NotFound { name, path } => {
                assert_eq!(name, "nope");
                assert!(path.ends_with("nope.md"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn get_prompt_loads_and_renders() {
        let (_tmp, loader) =
            loader_with(&[("executor.md", "Run {task}. Previous: {last_reply}")]);
        let vars = PromptVars::new()
            .with("task", "ls")
            .with("last_reply", "none");
        assert_eq!(
            loader.get_prompt("executor", &vars).unwrap(),
            "Run ls. Previous: none"
        );
    }

    #[test]
    fn get_prompt_reports_missing_key() {
        let (_tmp, loader) = loader_with(&[("executor.md", "Run {task}.")]);
        let err = loader.get_prompt("executor", &PromptVars::new()).unwrap_err();
        assert!(matches!(err, PromptError::MissingKey(ref k) if k == "task"));
    }

    #[test]
    fn rejects_names_that_escape_the_directory() {
        let loader = PromptLoader::new("/tmp/prompts");
        for bad in ["", "..", "../secret", "a/b", "a\\b"] {
            assert!(
                matches!(loader.template_path(bad), Err(PromptError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn template_path_appends_extension() {
        let loader = PromptLoader::new("/tmp/prompts");
        assert_eq!(
            loader.template_path("planner").unwrap(),
            PathBuf::from("/tmp/prompts/planner.md")
        );
    }

    #[test]
    fn available_prompts_lists_markdown_only() {
        let (_tmp, loader) = loader_with(&[
            ("b.md", "b"),
            ("a.md", "a"),
            ("notes.txt", "ignored"),
        ]);
        assert_eq!(loader.available_prompts().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn available_prompts_missing_dir_is_empty() {
        let loader = PromptLoader::new("/nonexistent/prompts/dir");
        assert!(loader.available_prompts().unwrap().is_empty());
    }

    #[test]
    fn bundled_templates_render() {
        let loader = PromptLoader::default();
        let names = loader.available_prompts().unwrap();
        assert!(names.contains(&"planner".to_string()));

        let vars = PromptVars::new()
            .with("task", "what is 2+2")
            .with("last_reply", "none");
        let out = loader.get_prompt("planner", &vars).unwrap();
        assert!(out.contains("what is 2+2"));
    }
}
