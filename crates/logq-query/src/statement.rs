//! Statements assembled from parsed clauses.
//!
//! A log search is a pipe of clauses. Filter clauses contribute to the statement's
//! condition and an `EXTRACT` clause contributes its unnest; [`LogPipeStatement::merge`]
//! folds the clauses of one pipe into a single statement.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    ast::{Expr, Op, VarRef},
    error::SemanticError,
};

/// Name of the regex extraction function applied by an unnest.
pub const MATCH_ALL: &str = "match_all";

/// Name of the function listing destination column types.
pub const DESTINATION_TYPES: &str = "array";

/// Type of every destination column produced by an extraction.
pub const DESTINATION_COLUMN_TYPE: &str = "varchar";

/// A regex extraction: apply `pattern` to `source`, producing one column per capture group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnnestClause {
    /// Field the pattern is applied to.
    pub source: VarRef,
    /// Regular expression text.
    pub pattern: String,
    /// Output column names in declaration order.
    pub destination_columns: Vec<String>,
}

impl UnnestClause {
    /// Builds an unnest from the term parsed inside `EXTRACT(...)`.
    ///
    /// The term must have the `field MATCHPHRASE 'pattern'` shape that the term grammar
    /// produces for both `field:"pattern"` and a bare `"pattern"`.
    pub fn from_term(term: Expr, columns: Vec<String>) -> Result<Self, SemanticError> {
        match term {
            Expr::Binary {
                op: Op::MatchPhrase,
                lhs,
                rhs,
            } => match (*lhs, *rhs) {
                (Expr::VarRef(source), Expr::StringLiteral(pattern)) => Ok(Self {
                    source,
                    pattern,
                    destination_columns: columns,
                }),
                (lhs, rhs) => Err(SemanticError::InvalidExtractPattern {
                    found: format!("{} MATCHPHRASE {}", describe(&lhs), describe(&rhs)),
                }),
            },
            other => Err(SemanticError::InvalidExtractPattern {
                found: describe(&other),
            }),
        }
    }

    /// Returns the `match_all(pattern, source)` call this clause evaluates.
    pub fn parse_func(&self) -> Expr {
        Expr::call(
            MATCH_ALL,
            vec![
                Expr::VarRef(VarRef::untyped(self.pattern.clone())),
                Expr::VarRef(self.source.clone()),
            ],
        )
    }

    /// Returns the `array(varchar, ...)` call describing the destination column types.
    pub fn dst_func(&self) -> Expr {
        Expr::call(
            DESTINATION_TYPES,
            self.destination_columns
                .iter()
                .map(|_| Expr::VarRef(VarRef::untyped(DESTINATION_COLUMN_TYPE)))
                .collect(),
        )
    }
}

/// Short description of an expression for error messages.
fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Binary { op, .. } => format!("{} expression", op.symbol()),
        Expr::Paren(_) => "parenthesized expression".into(),
        Expr::VarRef(var) => format!("field {}", var.name),
        Expr::StringLiteral(s) => format!("string '{s}'"),
        Expr::Wildcard => "wildcard".into(),
        Expr::Call { name, .. } => format!("call to {name}"),
    }
}

/// One pipe of filter and extraction clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPipeStatement {
    /// Combined filter condition.
    pub condition: Option<Expr>,
    /// Extraction applied after filtering.
    pub unnest: Option<UnnestClause>,
}

impl LogPipeStatement {
    /// Creates a statement holding only a filter condition.
    pub fn from_condition(condition: Expr) -> Self {
        Self {
            condition: Some(condition),
            unnest: None,
        }
    }

    /// Creates a statement holding only an extraction.
    pub fn from_unnest(unnest: UnnestClause) -> Self {
        Self {
            condition: None,
            unnest: Some(unnest),
        }
    }

    /// Combines the statements on either side of a `|`.
    ///
    /// Conditions are joined with AND; at most one side may carry an extraction.
    pub fn merge(self, other: Self) -> Result<Self, SemanticError> {
        let unnest = match (self.unnest, other.unnest) {
            (Some(_), Some(_)) => return Err(SemanticError::MultipleExtract),
            (left, right) => left.or(right),
        };

        let condition = match (self.condition, other.condition) {
            (Some(left), Some(right)) => Some(Expr::and(left, right)),
            (left, right) => left.or(right),
        };

        Ok(Self { condition, unnest })
    }
}

impl fmt::Display for LogPipeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LogPipeStatement")?;
        match &self.condition {
            Some(condition) => {
                writeln!(f, "  condition:")?;
                for line in condition.to_string().lines() {
                    writeln!(f, "    {line}")?;
                }
            }
            None => writeln!(f, "  condition: none")?,
        }
        match &self.unnest {
            Some(unnest) => {
                writeln!(
                    f,
                    "  unnest: {:?} from {} into {:?}",
                    unnest.pattern, unnest.source.name, unnest.destination_columns
                )
            }
            None => writeln!(f, "  unnest: none"),
        }
    }
}

/// The statements parsed from one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Statements in input order.
    pub statements: Vec<LogPipeStatement>,
}

impl Query {
    /// Creates a query holding a single statement.
    pub fn single(statement: LogPipeStatement) -> Self {
        Self {
            statements: vec![statement],
        }
    }

    /// Returns the first statement, if any.
    pub fn statement(&self) -> Option<&LogPipeStatement> {
        self.statements.first()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}
