//! Dispatch of parsed queries to registered stores.
//!
//! The root name of a query selects the store, its argument is the record
//! id, and its plain fields are what the store returns:
//!
//! ```
//! use sprig_query::{Executor, store::JsonStore};
//!
//! let people = JsonStore::from_json(serde_json::json!({
//!     "123": {"id": 123, "name": "Frank", "age": 23},
//! })).unwrap();
//!
//! let mut executor = Executor::new();
//! executor.register("people", people).unwrap();
//!
//! let response = executor.respond("people(123){id,name}".as_bytes());
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body, "{\"id\":123,\"name\":\"Frank\"}\n");
//! ```

use std::collections::HashMap;
use std::io::{self, Read};

use crate::{
    ast::ArgumentError,
    output,
    parser::{self, ParseError, ParseOptions},
    store::{Record, Store, StoreError},
};

/// Longest query text read by [`Executor::execute_reader`].
pub const DEFAULT_MAX_QUERY_BYTES: u64 = 512 * 1024;

/// Errors that can occur while executing a query.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("reading query failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("store not registered: {0}")]
    UnknownStore(String),

    #[error("store already registered: {0}")]
    AlreadyRegistered(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("query text is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ExecError {
    /// HTTP-style status code for reporting this error to a requester.
    pub fn status(&self) -> u16 {
        match self {
            ExecError::Parse(_) | ExecError::Argument(_) | ExecError::Utf8(_) => 400,
            ExecError::UnknownStore(_) | ExecError::Store(StoreError::NotFound { .. }) => 404,
            _ => 500,
        }
    }
}

/// Status and body of an answered request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// Registry of stores, keyed by the root name queries use to reach them.
pub struct Executor {
    stores: HashMap<String, Box<dyn Store + Send + Sync>>,
    max_query_bytes: u64,
    options: ParseOptions,
}

impl Default for Executor {
    fn default() -> Self {
        Executor {
            stores: HashMap::new(),
            max_query_bytes: DEFAULT_MAX_QUERY_BYTES,
            options: ParseOptions::default(),
        }
    }
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps how much query text [`Executor::execute_reader`] reads.
    /// Anything beyond the cap is ignored.
    pub fn with_max_query_bytes(mut self, limit: u64) -> Self {
        self.max_query_bytes = limit;
        self
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Makes `store` reachable as `name(..){..}`.
    pub fn register<S>(&mut self, name: impl Into<String>, store: S) -> Result<(), ExecError>
    where
        S: Store + Send + Sync + 'static,
    {
        let name = name.into();
        if self.stores.contains_key(&name) {
            return Err(ExecError::AlreadyRegistered(name));
        }
        tracing::debug!(store = %name, "registered store");
        self.stores.insert(name, Box::new(store));
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Parses `query` and resolves it against the matching store.
    pub fn execute(&self, query: &str) -> Result<Record, ExecError> {
        let root = parser::parse_with(query, self.options)?;

        let store = self
            .stores
            .get(root.name())
            .ok_or_else(|| ExecError::UnknownStore(root.name().to_string()))?;
        let id = root.id()?;
        let fields = root.plain_fields();

        tracing::debug!(store = root.name(), id, fields = ?fields, "dispatching query");
        Ok(store.get(id, &fields)?)
    }

    /// Reads at most the configured number of bytes, then executes them.
    pub fn execute_reader<R: Read>(&self, reader: R) -> Result<Record, ExecError> {
        let mut buffer = Vec::new();
        reader.take(self.max_query_bytes).read_to_end(&mut buffer)?;
        let query = String::from_utf8(buffer)?;
        self.execute(&query)
    }

    /// Executes a request body and renders the answer.
    ///
    /// Success is `200` with a compact JSON object; failure carries the
    /// error's [`status`](ExecError::status) and message. Both bodies end
    /// with a newline.
    pub fn respond<R: Read>(&self, reader: R) -> Response {
        match self.execute_reader(reader) {
            Ok(record) => Response {
                status: 200,
                body: format!("{}\n", output::to_json(&record)),
            },
            Err(e) => {
                tracing::warn!(error = %e, "query failed");
                Response {
                    status: e.status(),
                    body: format!("{}\n", e),
                }
            }
        }
    }
}
