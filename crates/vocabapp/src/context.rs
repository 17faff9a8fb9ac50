//! # Storage Context: Which Backends Exist
//!
//! Everything the facade needs to know about storage is held in one
//! explicitly built [`StorageContext`]: the local backend, the remote
//! backend if there is one, and a configuration error if building the
//! remote failed. Nothing here is global; tests build a context from fakes,
//! the CLI builds one from [`VocabConfig`].
//!
//! ## "Configured" Is a Capability Check
//!
//! The remote counts as configured once credentials are present and the URL
//! parses. No network request happens here; the first real operation finds
//! out whether the service answers.
//!
//! ## Bad Configuration Does Not Abort
//!
//! A half-configured remote (URL without key, or the reverse) or an
//! unusable URL leaves the context local-only. The error is kept and
//! handed to the facade, which reports it once.

use crate::config::VocabConfig;
use crate::error::{Result, VocabError};
use crate::store::local::FileStore;
use crate::store::remote::RestBackend;
use crate::store::WordBackend;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub struct StorageContext {
    local: Arc<dyn WordBackend>,
    remote: Option<Arc<dyn WordBackend>>,
    config_error: Mutex<Option<String>>,
}

impl StorageContext {
    pub fn new(local: Arc<dyn WordBackend>, remote: Option<Arc<dyn WordBackend>>) -> Self {
        Self {
            local,
            remote,
            config_error: Mutex::new(None),
        }
    }

    pub fn local_only(local: Arc<dyn WordBackend>) -> Self {
        Self::new(local, None)
    }

    /// Local-only context that reports `error` on first use.
    pub fn with_config_error(local: Arc<dyn WordBackend>, error: impl Into<String>) -> Self {
        Self {
            local,
            remote: None,
            config_error: Mutex::new(Some(error.into())),
        }
    }

    /// Build the file store under `data_dir` and, when the configuration
    /// carries usable credentials, the remote backend.
    pub fn from_config(config: &VocabConfig, data_dir: &Path) -> Self {
        let local: Arc<dyn WordBackend> = Arc::new(FileStore::new(data_dir));
        debug!(data_dir = %data_dir.display(), "local store ready");

        match config.remote_settings().and_then(|s| match s {
            Some(settings) => RestBackend::new(&settings).map(Some),
            None => Ok(None),
        }) {
            Ok(Some(remote)) => {
                debug!(url = %remote.table_url(), "remote store configured");
                let remote: Arc<dyn WordBackend> = Arc::new(remote);
                Self::new(local, Some(remote))
            }
            Ok(None) => {
                debug!("no remote store configured, running local-only");
                Self::local_only(local)
            }
            Err(err) => {
                warn!("remote store disabled: {}", err);
                Self::with_config_error(local, config_message(err))
            }
        }
    }

    pub fn is_remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    pub fn local(&self) -> &Arc<dyn WordBackend> {
        &self.local
    }

    pub fn remote(&self) -> Option<&Arc<dyn WordBackend>> {
        self.remote.as_ref()
    }

    /// Hand out the pending configuration error. Returns it only once.
    pub fn take_config_error(&self) -> Option<String> {
        self.config_error.lock().ok().and_then(|mut e| e.take())
    }
}

fn config_message(err: VocabError) -> String {
    match err {
        VocabError::Config(msg) => msg,
        other => other.to_string(),
    }
}

/// Load the configuration and build a context from it.
/// `data_dir` overrides the configured directory.
pub fn initialize(
    data_dir: Option<&Path>,
    local_only: bool,
) -> Result<(StorageContext, VocabConfig)> {
    let config = VocabConfig::load()?;
    let dir = data_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.data_dir());
    let ctx = if local_only {
        StorageContext::local_only(Arc::new(FileStore::new(&dir)))
    } else {
        StorageContext::from_config(&config, &dir)
    };
    Ok((ctx, config))
}
