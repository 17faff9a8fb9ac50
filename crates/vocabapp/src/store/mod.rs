//! # Storage Layer
//!
//! This module defines the storage abstraction for vocab. The [`WordBackend`]
//! trait lets the facade drive two interchangeable backends with one API.
//!
//! ## Two Backends, One Contract
//!
//! 1. **Remote**: a hosted table behind a REST interface ([`remote::RestBackend`]).
//!    It is authoritative, multi-user and row-level secured: every row has an
//!    owner and the service only ever shows a user their own rows.
//! 2. **Local**: a single JSON blob on this machine ([`local::LocalStore`]).
//!    Single-tenant; everything in it belongs to whoever runs the program.
//!
//! Backends return words in no particular order. Ordering is
//! [`crate::ordering`]'s job.
//!
//! ## Local Layering
//!
//! The local backend mirrors how storage is split elsewhere in this crate:
//! - [`blob::BlobStorage`] handles the "how" (filesystem file vs. memory map).
//! - [`local::LocalStore`] handles the "what" (ids, timestamps, toggles).
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! └── vocabulary_list.json    # the whole collection, one JSON array
//! ```
//!
//! ## Implementations
//!
//! - [`local::FileStore`]: production local store.
//! - [`local::InMemoryStore`]: for testing logic without filesystem I/O.
//! - [`remote::RestBackend`]: the hosted store.

use crate::error::Result;
use crate::model::{NewWord, Word, WordId, WordPatch};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

pub mod blob;
pub mod local;
pub mod remote;
pub mod schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Remote,
    Local,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Remote => write!(f, "remote"),
            BackendKind::Local => write!(f, "local"),
        }
    }
}

/// Abstract interface for word storage.
///
/// Inputs arrive already validated by the facade. Implementations stamp
/// their own timestamps and assign ids.
#[async_trait]
pub trait WordBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// All words visible to the current owner, unordered.
    async fn list(&self) -> Result<Vec<Word>>;

    async fn add(&self, new: &NewWord) -> Result<Word>;

    /// Apply the provided fields. `NotFound` if the id is unknown.
    async fn update(&self, id: &WordId, patch: &WordPatch) -> Result<Word>;

    /// Hard delete. Removing an unknown id succeeds.
    async fn remove(&self, id: &WordId) -> Result<()>;

    /// Flip `is_favorite` and stamp `updated_at` as one logical operation.
    async fn toggle_favorite(&self, id: &WordId) -> Result<Word>;

    /// Cheap reachability check.
    async fn health(&self) -> Result<()> {
        Ok(())
    }
}
