//! CLI support for sprig
//!
//! Provides programmatic access to the `sprig` commands so they can be
//! embedded and tested without spawning a process.

mod check;
mod run;

pub use check::{execute_check, CheckOptions, CheckResult};
pub use run::{execute_run, load_executor, RunOptions};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Query failed: {0}")]
    Exec(#[from] crate::ExecError),

    #[error("Invalid data file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data file: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoQuery,
}
