//! Query parsing, AST and canonical rendering for logq log search.
//!
//! This crate turns a log search string into a [`Query`] and renders it back in the
//! canonical condition form the execution engine consumes:
//!
//! - **Terms**: `error` - phrase match against the default field
//! - **Phrases**: `"get images"` - one term spanning several words
//! - **Fields**: `host:10.0.0.1` - phrase match against a named field
//! - **Presence**: `host:*` - field has any value
//! - **Ranges**: `status in [200 300)` - inclusive or exclusive bounds
//! - **Comparisons**: `latency>=100`
//! - **AND/OR**: `a b`, `a AND b`, `a OR b` - adjacency means AND
//! - **Grouping**: `(a OR b) c` - preserved in the output
//! - **Extraction**: `EXTRACT(tags:"(\w+)=(\w+)") AS(key, value)`
//! - **Pipes**: `a | EXTRACT(...) AS(...) | b` - clauses merge into one statement
//!
//! # Example
//!
//! ```
//! use logq_query::{Canonical, parse};
//!
//! let query = parse("get images|host:web-1").unwrap();
//! assert_eq!(
//!     query.to_canonical_string(),
//!     "content::string MATCHPHRASE 'get' AND content::string MATCHPHRASE 'images' \
//!      AND host::string MATCHPHRASE 'web-1'"
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;
mod render;
mod statement;

pub use ast::{DEFAULT_FIELD, DataType, Expr, Op, VarRef};
pub use error::{LexError, ParseError, ParseErrorKind, SemanticError, SyntaxError};
pub use lexer::{SpannedToken, Token, TokenKind, is_field_name, tokenize, tokenize_spanned};
pub use parser::{LogParser, MAX_DEPTH, ParserOptions, parse};
pub use render::Canonical;
pub use statement::{
    DESTINATION_COLUMN_TYPE, DESTINATION_TYPES, LogPipeStatement, MATCH_ALL, Query, UnnestClause,
};
