//! Execute sprig queries against stores loaded from a JSON data file

use std::path::{Path, PathBuf};

use crate::{Executor, ParseOptions, store::{JsonStore, Record}};

use super::CliError;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The query to execute
    pub query: String,
    /// JSON file of the form `{"<store>": {"<id>": {<field>: <scalar>}}}`
    pub data: PathBuf,
    /// Nesting limit; the parser default when `None`
    pub max_depth: Option<usize>,
}

/// Builds an executor with one [`JsonStore`] per top-level key of `path`.
pub fn load_executor(path: &Path) -> Result<Executor, CliError> {
    let text = std::fs::read_to_string(path)?;
    let document: serde_json::Value = serde_json::from_str(&text)?;

    let serde_json::Value::Object(stores) = document else {
        return Err(crate::store::StoreError::Malformed(
            "expected an object of stores keyed by name".to_string(),
        )
        .into());
    };

    let mut executor = Executor::new();
    for (name, records) in stores {
        let store = JsonStore::from_json(records)?;
        tracing::debug!(store = %name, records = store.len(), "loaded store");
        executor.register(name, store)?;
    }
    Ok(executor)
}

/// Execute a sprig run operation
pub fn execute_run(options: &RunOptions) -> Result<Record, CliError> {
    let mut executor = load_executor(&options.data)?;
    if let Some(max_depth) = options.max_depth {
        executor = executor.with_parse_options(ParseOptions { max_depth });
    }
    Ok(executor.execute(options.query.trim())?)
}
