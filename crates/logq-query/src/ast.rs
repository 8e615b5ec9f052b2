//! Query abstract syntax tree.
//!
//! Represents parsed filter conditions before they are handed to the execution engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field name used when a term carries no explicit field.
pub const DEFAULT_FIELD: &str = "content";

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Op {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Phrase containment of a literal within a field.
    MatchPhrase,
    /// Textual inequality.
    Neq,
    /// Textual greater-than.
    Gt,
    /// Textual greater-than-or-equal.
    Gte,
    /// Textual less-than.
    Lt,
    /// Textual less-than-or-equal.
    Lte,
}

impl Op {
    /// Returns the operator as written in the canonical form.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::MatchPhrase => "MATCHPHRASE",
            Self::Neq => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// Declared type of a field reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// A string column; rendered with a `::string` suffix.
    String,
    /// No declared type; rendered as a quoted identifier.
    Unknown,
}

/// A reference to a field (column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarRef {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
}

impl VarRef {
    /// Creates a string-typed field reference.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::String,
        }
    }

    /// Creates a field reference without a declared type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::Unknown,
        }
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Binary operation over two operands.
    Binary {
        /// The operator.
        op: Op,
        /// Left operand.
        lhs: Box<Self>,
        /// Right operand.
        rhs: Box<Self>,
    },

    /// Explicit parenthesized grouping from the input.
    Paren(Box<Self>),

    /// Field reference.
    VarRef(VarRef),

    /// String literal.
    StringLiteral(String),

    /// The bare `*`.
    Wildcard,

    /// Function call.
    Call {
        /// Function name.
        name: String,
        /// Arguments in order.
        args: Vec<Self>,
    },
}

impl Expr {
    /// Creates a binary expression.
    pub fn binary(op: Op, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Creates a conjunction.
    pub fn and(lhs: Self, rhs: Self) -> Self {
        Self::binary(Op::And, lhs, rhs)
    }

    /// Creates a disjunction.
    pub fn or(lhs: Self, rhs: Self) -> Self {
        Self::binary(Op::Or, lhs, rhs)
    }

    /// Creates a parenthesized group.
    pub fn paren(inner: Self) -> Self {
        Self::Paren(Box::new(inner))
    }

    /// Creates a string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringLiteral(value.into())
    }

    /// Creates `field MATCHPHRASE 'value'`.
    pub fn match_phrase(field: VarRef, value: impl Into<String>) -> Self {
        Self::binary(Op::MatchPhrase, Self::VarRef(field), Self::string(value))
    }

    /// Creates `field != ''`, the predicate for "field has any value".
    pub fn not_empty(field: VarRef) -> Self {
        Self::binary(Op::Neq, Self::VarRef(field), Self::string(""))
    }

    /// Creates a function call.
    pub fn call(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Call {
            name: name.into(),
            args,
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Binary { op, lhs, rhs } => {
                writeln!(f, "{prefix}Binary({op:?})")?;
                lhs.fmt_tree(f, indent + 1)?;
                rhs.fmt_tree(f, indent + 1)
            }
            Self::Paren(inner) => {
                writeln!(f, "{prefix}Paren")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::VarRef(var) => writeln!(f, "{prefix}VarRef({:?}, {:?})", var.name, var.data_type),
            Self::StringLiteral(s) => writeln!(f, "{prefix}StringLiteral({s:?})"),
            Self::Wildcard => writeln!(f, "{prefix}Wildcard"),
            Self::Call { name, args } => {
                writeln!(f, "{prefix}Call({name:?})")?;
                for arg in args {
                    arg.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
