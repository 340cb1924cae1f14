use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::prompts::{default_prompts_dir, PromptLoader};
use crate::sessions::{InMemorySessionStore, DEFAULT_MAX_LAST_REPLY_LENGTH};

const CONFIG_DIR_NAME: &str = ".agent-memo";
const CONFIG_FILE_NAME: &str = "config.toml";

// ── Top-level config ──────────────────────────────────────────────

/// Top-level configuration, loaded from `config.toml`.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `<name>.md` prompt templates. Default: the bundled `prompts/`.
    #[serde(default)]
    pub prompts_dir: Option<PathBuf>,

    /// Session memory settings (`[sessions]`).
    #[serde(default)]
    pub sessions: SessionsConfig,
}

/// Session memory configuration (`[sessions]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Characters of the latest reply kept as a snippet. Default: `200`.
    #[serde(default = "default_max_last_reply_length")]
    pub max_last_reply_length: usize,
}

fn default_max_last_reply_length() -> usize {
    DEFAULT_MAX_LAST_REPLY_LENGTH
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_last_reply_length: default_max_last_reply_length(),
        }
    }
}

/// `~/.agent-memo/config.toml`, or `None` when no home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|u| u.home_dir().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

// ── Config impl ──────────────────────────────────────────────────

impl Config {
    /// Parse and validate the TOML file at `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        warn_if_world_readable(path).await;

        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;

        tracing::info!(
            path = %path.display(),
            prompts_dir = %config.resolved_prompts_dir().display(),
            max_last_reply_length = config.sessions.max_last_reply_length,
            "Config loaded"
        );
        Ok(config)
    }

    /// Load the default config file if it exists, otherwise use defaults.
    /// Never writes anything to disk.
    pub async fn load_or_default() -> Result<Self> {
        Self::load_or_default_from(default_config_path()).await
    }

    /// Load `path` if it is given and exists, otherwise use defaults.
    pub async fn load_or_default_from(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) if fs::try_exists(&path).await.unwrap_or(false) => {
                Self::load_from(&path).await
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject values that would make the cache or loader misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.sessions.max_last_reply_length == 0 {
            anyhow::bail!("sessions.max_last_reply_length must be greater than 0");
        }
        if let Some(dir) = &self.prompts_dir {
            if dir.as_os_str().is_empty() {
                anyhow::bail!("prompts_dir must not be empty");
            }
        }
        Ok(())
    }

    /// Configured prompts directory, or the bundled one.
    pub fn resolved_prompts_dir(&self) -> PathBuf {
        self.prompts_dir.clone().unwrap_or_else(default_prompts_dir)
    }

    /// A fresh session store using the configured truncation length.
    pub fn session_store(&self) -> InMemorySessionStore {
        InMemorySessionStore::with_max_last_reply_length(self.sessions.max_last_reply_length)
    }

    /// A prompt loader rooted at [`Self::resolved_prompts_dir`].
    pub fn prompt_loader(&self) -> PromptLoader {
        PromptLoader::new(self.resolved_prompts_dir())
    }
}

#[cfg(unix)]
async fn warn_if_world_readable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = fs::metadata(path).await {
        let mode = meta.permissions().mode();
        if mode & 0o004 != 0 {
            tracing::warn!(
                "Config file {:?} is world-readable (mode {:o}). \
                 Consider restricting with: chmod 600 {:?}",
                path,
                mode & 0o777,
                path,
            );
        }
    }
}

#[cfg(not(unix))]
async fn warn_if_world_readable(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::SessionStore;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sessions.max_last_reply_length, 200);
        assert!(config.prompts_dir.is_none());
        assert_eq!(config.resolved_prompts_dir(), default_prompts_dir());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn zero_truncation_length_is_rejected() {
        let mut config = Config::default();
        config.sessions.max_last_reply_length = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_last_reply_length"));
    }

    #[test]
    fn empty_prompts_dir_is_rejected() {
        let config = Config {
            prompts_dir: Some(PathBuf::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn session_store_uses_configured_length() {
        let config = Config {
            sessions: SessionsConfig {
                max_last_reply_length: 3,
            },
            ..Config::default()
        };
        let store = config.session_store();
        let handle = store.get("s");
        let mut mem = handle.lock();
        mem.set_last_reply(Some("abcdef"));
        assert_eq!(mem.last_reply(), Some("abc..."));
    }

    #[tokio::test]
    async fn load_from_parses_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "prompts_dir = \"/srv/prompts\"\n\n[sessions]\nmax_last_reply_length = 80\n",
        )
        .unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config.prompts_dir, Some(PathBuf::from("/srv/prompts")));
        assert_eq!(config.sessions.max_last_reply_length, 80);
        assert_eq!(config.prompt_loader().prompts_dir(), Path::new("/srv/prompts"));
    }

    #[tokio::test]
    async fn load_from_rejects_invalid_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[sessions]\nmax_last_reply_length = 0\n").unwrap();

        assert!(Config::load_from(&path).await.is_err());
    }

    #[tokio::test]
    async fn load_from_reports_parse_errors_with_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "sessions = [not toml").unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[tokio::test]
    async fn load_or_default_from_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default_from(Some(tmp.path().join("config.toml")))
            .await
            .unwrap();
        assert_eq!(config, Config::default());

        let config = Config::load_or_default_from(None).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn load_or_default_from_reads_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[sessions]\nmax_last_reply_length = 42\n").unwrap();

        let config = Config::load_or_default_from(Some(path)).await.unwrap();
        assert_eq!(config.sessions.max_last_reply_length, 42);
        assert!(config.prompts_dir.is_none());
    }

    #[tokio::test]
    async fn load_or_default_from_validates_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[sessions]\nmax_last_reply_length = 0\n").unwrap();

        assert!(Config::load_or_default_from(Some(path)).await.is_err());
    }

    #[tokio::test]
    async fn load_from_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load_from(&tmp.path().join("absent.toml")).await;
        assert!(result.is_err());
    }
}
