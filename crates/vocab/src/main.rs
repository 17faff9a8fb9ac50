//! # Vocab CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/vocabapp/`: the UI-agnostic library (model, ordering, storage,
//!   the `WordStore` facade).
//! - `crates/vocab/`: this CLI, a client of that library.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/vocab/src/cli/)                          │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Facade (crates/vocabapp/src/facade.rs)                     │
//! │  - Validation, remote-then-local routing                    │
//! │  - Returns `Served<T>`: value + route + notices             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from the facade inward returns plain Rust values. The CLI
//! decides what reaches stdout, what reaches stderr, and the exit code.
//! Library logging goes through `tracing`; the CLI installs the subscriber.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
