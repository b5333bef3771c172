//! Validate sprig queries and show how they are read

use crate::{Lexer, ParseOptions, output};

use super::CliError;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to check
    pub query: String,
    /// Nesting limit; the parser default when `None`
    pub max_depth: Option<usize>,
    /// List tokens instead of building the tree
    pub tokens: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// One line per token, terminal token included
    Tokens(Vec<String>),
    /// The selection tree, as rendered by [`output::tree_to_json`]
    Tree(serde_json::Value),
}

/// Execute a sprig check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = options.query.as_str();

    if options.tokens {
        let tokens = Lexer::new(query).map(|token| token.to_string()).collect();
        return Ok(CheckResult::Tokens(tokens));
    }

    let mut parse_options = ParseOptions::default();
    if let Some(max_depth) = options.max_depth {
        parse_options.max_depth = max_depth;
    }
    let root = crate::parse_with(query, parse_options)?;
    Ok(CheckResult::Tree(output::tree_to_json(&root)))
}
