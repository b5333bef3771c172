//! # Sprig Query Language - Tokens and Selection Tree
//!
//! A sprig query names one record, optionally an argument identifying it,
//! and the fields to return, which may nest:
//!
//! ```text
//! node(1572451031) {
//!     id,
//!     name,
//!     birthdate { month, day },
//!     friends.after(3500401).first(2) {
//!         cursor,
//!         node { name }
//!     }
//! }
//! ```
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[node]** - The selection tree produced by the parser
//!
//! ## Leaf and Composite Selections
//!
//! A selection followed by `{ ... }` is *composite*; every other selection is
//! a *leaf* (a plain scalar field). The root is always composite.
//!
//! ## Arguments
//!
//! Text between parentheses is kept verbatim. Only [`QueryNode::id`] gives it
//! a meaning, a base-10 integer.
pub mod node;
pub mod tokens;

pub use node::{ArgumentError, Call, QueryNode, Selection};
pub use tokens::{Token, TokenKind};
