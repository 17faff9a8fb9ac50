use crate::model::WordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Word not found: {0}")]
    NotFound(WordId),

    #[error("Sign-in required: the remote store has no authenticated user")]
    AuthRequired,

    #[error("Backend unavailable (remote: {remote}; local: {local})")]
    BackendUnavailable { remote: String, local: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store answered {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl VocabError {
    /// Infrastructure failures. When the local retry after a remote error
    /// fails with one of these, the facade reports `BackendUnavailable`;
    /// validation, auth and not-found are answers and surface as-is.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            VocabError::Io(_)
                | VocabError::Serialization(_)
                | VocabError::Http(_)
                | VocabError::Remote { .. }
                | VocabError::Store(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, VocabError>;
