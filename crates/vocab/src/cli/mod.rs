//! # CLI Behavior
//!
//! This is **one possible UI client** for vocab, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and
//! output formatting.
//!
//! ## Naked Execution (`vocab`)
//!
//! Running `vocab` with no arguments defaults to `vocab list`.
//!
//! ## Where the Data Went
//!
//! Every library call reports the route that served it. When the remote
//! store failed and the local one answered, or when the remote settings are
//! broken, the CLI prints a warning on stderr and still shows the result on
//! stdout. Scripts reading stdout are unaffected.
//!
//! ## Ids
//!
//! Words are addressed by their store id as shown in the first column of
//! `vocab list` (a number for the remote store, `local-…` for the local one).
//!
//! ## Module Structure
//!
//! - `setup.rs`: clap definitions and the version string.
//! - `commands.rs`: runtime, logging and context setup, dispatch.
//! - `render.rs`: turns library values into terminal text.
//! - `styles.rs`: the shared console styles.

mod commands;
mod render;
mod setup;
mod styles;

pub use commands::run;
