//! Error types for query parsing.
//!
//! This module provides error types for lexing, parsing, and the semantic checks that
//! run while statements are assembled.

use std::{error, fmt};

use thiserror::Error;

use crate::lexer::TokenKind;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.position)
    }
}

impl error::Error for LexError {}

/// Syntax error raised when no grammar rule accepts the current token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Error message.
    pub message: String,
    /// Index of the offending token (`None` at end of input).
    pub token_index: Option<usize>,
    /// Byte offset of the offending token (`None` at end of input).
    pub position: Option<usize>,
    /// The token that was found.
    pub found: TokenKind,
    /// Tokens that would have been accepted instead.
    pub expected: Vec<TokenKind>,
}

impl SyntaxError {
    /// Creates a new syntax error.
    pub fn new(
        message: impl Into<String>,
        token_index: Option<usize>,
        position: Option<usize>,
        found: TokenKind,
    ) -> Self {
        Self {
            message: message.into(),
            token_index,
            position,
            found,
            expected: Vec::new(),
        }
    }

    /// Sets the accepted-token set.
    pub fn expecting(mut self, expected: &[TokenKind]) -> Self {
        self.expected = expected.to_vec();
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(idx) = self.token_index {
            write!(f, "at token {}: {}", idx, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if !self.expected.is_empty() {
            write!(f, ", expected {}", format_expected(&self.expected))?;
        }
        Ok(())
    }
}

impl error::Error for SyntaxError {}

/// Formats an accepted-token set as `A, B or C`.
fn format_expected(expected: &[TokenKind]) -> String {
    let names: Vec<String> = expected.iter().map(ToString::to_string).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

/// Violations detected while assembling a statement from well-formed syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// More than one `EXTRACT` clause was piped into the same statement.
    #[error("only one extract statement is supported")]
    MultipleExtract,

    /// A field compared as a string column has a name the engine cannot read back.
    #[error("invalid field name {field:?}")]
    InvalidFieldName {
        /// The rejected name.
        field: String,
    },

    /// The `EXTRACT(...)` argument is not a field/pattern pair.
    #[error("expected a field and pattern in EXTRACT, found {found}")]
    InvalidExtractPattern {
        /// Description of what was found instead.
        found: String,
    },
}

/// The error returned by the parser facade.
///
/// Carries the original query so it can be printed with a position indicator and a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error that occurred.
    pub kind: ParseErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Tokenization failed.
    Lex(LexError),
    /// Invalid syntax.
    Syntax(SyntaxError),
    /// Syntax was valid but a statement could not be built.
    Semantic(SemanticError),
}

impl ParseError {
    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::Lex(err) => err.message.clone(),
            ParseErrorKind::Syntax(err) => {
                if err.expected.is_empty() {
                    err.message.clone()
                } else {
                    format!("{}, expected {}", err.message, format_expected(&err.expected))
                }
            }
            ParseErrorKind::Semantic(err) => err.to_string(),
        }
    }

    /// Returns the byte position of the error, when known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            ParseErrorKind::Lex(err) => Some(err.position),
            ParseErrorKind::Syntax(err) => err.position,
            ParseErrorKind::Semantic(_) => None,
        }
    }

    /// Returns true for the multiple-extract semantic error.
    pub fn is_multiple_extract(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::Semantic(SemanticError::MultipleExtract)
        )
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            ParseErrorKind::Lex(err) if err.message.contains("unclosed quote") => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            ParseErrorKind::Syntax(err) if err.expected.contains(&TokenKind::RParen) => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            ParseErrorKind::Syntax(err) if matches!(err.found, TokenKind::Or | TokenKind::And) => {
                Some("AND/OR require expressions on both sides, e.g., 'error OR warn'")
            }
            ParseErrorKind::Semantic(SemanticError::MultipleExtract) => {
                Some("Combine the columns into a single EXTRACT(...) AS(...) clause")
            }
            ParseErrorKind::Semantic(SemanticError::InvalidFieldName { .. }) => Some(
                "Field names start with a letter or '_' and may contain letters, digits, '_', '.', '-' and '@'",
            ),
            ParseErrorKind::Semantic(SemanticError::InvalidExtractPattern { .. }) => {
                Some("Write the pattern as EXTRACT(field:\"regex\") or EXTRACT(\"regex\")")
            }
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match &self.kind {
            ParseErrorKind::Lex(_) | ParseErrorKind::Syntax(_) => "query syntax error",
            ParseErrorKind::Semantic(_) => "query error",
        };

        writeln!(f, "{}: {}", prefix, self.message())?;

        // If we have a query and position, show it with a pointer
        if let Some(query) = &self.query {
            writeln!(f, "  {}", query)?;
            if let Some(pos) = self.position() {
                let clamped = pos.min(query.len());
                let column = query
                    .get(..clamped)
                    .map_or(clamped, |prefix| prefix.chars().count());
                writeln!(f, "  {}^", " ".repeat(column))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {}", suggestion)?;
        }

        Ok(())
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Lex(err) => Some(err),
            ParseErrorKind::Syntax(err) => Some(err),
            ParseErrorKind::Semantic(err) => Some(err),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let query = Some(err.input.clone());
        Self {
            kind: ParseErrorKind::Lex(err),
            query,
        }
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        Self {
            kind: ParseErrorKind::Syntax(err),
            query: None,
        }
    }
}

impl From<SemanticError> for ParseError {
    fn from(err: SemanticError) -> Self {
        Self {
            kind: ParseErrorKind::Semantic(err),
            query: None,
        }
    }
}
