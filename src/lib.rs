pub mod ast;
pub mod cli;
pub mod executor;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod store;
pub mod value;

pub use ast::{ArgumentError, Call, QueryNode, Selection, Token, TokenKind};
pub use executor::{ExecError, Executor, Response};
pub use lexer::Lexer;
pub use output::{to_json, to_json_pretty, tree_to_json};
pub use parser::{parse, parse_with, ParseError, ParseOptions, Parser};
pub use store::{JsonStore, Record, Store, StoreError};
pub use value::Value;
