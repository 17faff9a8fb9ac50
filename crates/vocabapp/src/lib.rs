//! # Vocab Architecture
//!
//! Vocab is a **UI-agnostic vocabulary notebook library**. The `vocab` binary
//! is one client of it; nothing in here writes to a terminal.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the `vocab` CLI, or anything else)                 │
//! │  - Parses input, renders output, owns stdout/stderr         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Facade (facade.rs)                                         │
//! │  - Validates input before any backend call                  │
//! │  - Tries the remote store, falls back to the local one      │
//! │  - Reports the route taken and broadcasts changes           │
//! └─────────────────────────────────────────────────────────────┘
//!              │                                  │
//!              ▼                                  ▼
//! ┌──────────────────────────┐     ┌──────────────────────────┐
//! │  Ordering (ordering.rs)  │     │  Storage (store/)        │
//! │  - Favorites-first sort  │     │  - WordBackend trait     │
//! │  - Multi-field search    │     │  - RestBackend (remote)  │
//! │  - Pure, no I/O          │     │  - LocalStore (fallback) │
//! └──────────────────────────┘     └──────────────────────────┘
//! ```
//!
//! The facade is built from an explicit [`context::StorageContext`]; there
//! is no process-wide state. Tests hand it fakes, the CLI builds it from
//! [`config::VocabConfig`].
//!
//! ## Module Overview
//!
//! - [`model`]: `Word` and its inputs; legacy record normalization.
//! - [`ordering`]: sort keys, sorting, search, favorite grouping.
//! - [`store`]: backends and the on-disk layout.
//! - [`context`]: which backends exist, built from configuration.
//! - [`facade`]: the `WordStore` API.
//! - [`stats`]: learning statistics.
//! - [`samples`]: a starter vocabulary.
//! - [`config`]: layered configuration.
//! - [`error`]: the error type.

pub mod config;
pub mod context;
pub mod error;
pub mod facade;
pub mod model;
pub mod ordering;
pub mod samples;
pub mod stats;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use error::{Result, VocabError};
pub use facade::{Route, Served, WordStore};
pub use model::{NewWord, Word, WordId, WordPatch};
pub use ordering::SortKey;
