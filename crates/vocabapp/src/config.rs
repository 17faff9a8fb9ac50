//! # Configuration
//!
//! Vocab configuration is managed by [`confique`], which handles layered
//! loading from environment variables, a TOML file and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `VOCAB_REMOTE_URL`, `VOCAB_REMOTE_KEY`, etc.
//! 2. **Config file**: `vocab.toml` in the OS config directory (via the
//!    `directories` crate), or the path in `VOCAB_CONFIG`.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `remote_url` | `VOCAB_REMOTE_URL` | none | Base URL of the hosted store |
//! | `remote_key` | `VOCAB_REMOTE_KEY` | none | Public (anon) API key |
//! | `access_token` | `VOCAB_ACCESS_TOKEN` | none | Signed-in user's token |
//! | `data_dir` | `VOCAB_DATA_DIR` | OS data dir | Where the local store lives |
//! | `default_sort` | `VOCAB_DEFAULT_SORT` | `updated_desc` | Sort used by `vocab list` |
//! | `request_timeout_secs` | `VOCAB_REQUEST_TIMEOUT_SECS` | none | Per-request remote timeout |
//!
//! The remote store counts as configured once both `remote_url` and
//! `remote_key` are set. Setting only one of them is a configuration error;
//! it does not stop the program, it just keeps it local-only (see
//! [`crate::context`]).

use crate::error::{Result, VocabError};
use crate::ordering::SortKey;
use confique::Config;
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "vocab.toml";
pub const CONFIG_PATH_ENV: &str = "VOCAB_CONFIG";

/// Configuration for vocab, stored in `vocab.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VocabConfig {
    /// Base URL of the hosted store, e.g. "https://xyz.supabase.co"
    #[config(env = "VOCAB_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Public API key sent with every remote request.
    #[config(env = "VOCAB_REMOTE_KEY")]
    pub remote_key: Option<String>,

    /// Access token of the signed-in user. Without it the remote store has
    /// no principal: lists come back empty and adds are refused.
    #[config(env = "VOCAB_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    /// Directory for the local store.
    #[config(env = "VOCAB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[config(env = "VOCAB_DEFAULT_SORT", default = "updated_desc")]
    pub default_sort: String,

    /// No timeout when absent.
    #[config(env = "VOCAB_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            remote_key: None,
            access_token: None,
            data_dir: None,
            default_sort: SortKey::default().to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Validated connection settings for the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub url: Url,
    pub key: String,
    pub access_token: Option<String>,
    pub timeout: Option<Duration>,
}

impl VocabConfig {
    /// Load from the environment and the config file at `path` (a missing
    /// file is fine).
    pub fn load_from(path: &Path) -> Result<Self> {
        VocabConfig::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| VocabError::Config(e.to_string()))
    }

    /// Load from the environment and the default config file.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => VocabConfig::builder()
                .env()
                .load()
                .map_err(|e| VocabError::Config(e.to_string())),
        }
    }

    /// The configured sort key, or the default when it doesn't parse.
    pub fn default_sort(&self) -> SortKey {
        self.default_sort.parse().unwrap_or_else(|err| {
            tracing::warn!("{}; using {}", err, SortKey::default());
            SortKey::default()
        })
    }

    /// `Ok(None)` when no remote is configured at all. Half a configuration
    /// or an unusable URL is an error.
    pub fn remote_settings(&self) -> Result<Option<RemoteSettings>> {
        let url = non_blank(&self.remote_url);
        let key = non_blank(&self.remote_key);

        let (url, key) = match (url, key) {
            (None, None) => return Ok(None),
            (Some(url), Some(key)) => (url, key),
            (Some(_), None) => {
                return Err(VocabError::Config(
                    "remote_url is set but remote_key is missing".to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(VocabError::Config(
                    "remote_key is set but remote_url is missing".to_string(),
                ))
            }
        };

        let url = Url::parse(&url)
            .map_err(|e| VocabError::Config(format!("invalid remote_url '{}': {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(VocabError::Config(format!(
                "remote_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(Some(RemoteSettings {
            url,
            key,
            access_token: non_blank(&self.access_token),
            timeout: self
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }))
    }

    /// Explicit `data_dir`, else the OS data directory, else `.vocab`.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        ProjectDirs::from("", "", "vocab")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".vocab"))
    }
}

/// `VOCAB_CONFIG` if set, else `vocab.toml` in the OS config directory.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "vocab").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
