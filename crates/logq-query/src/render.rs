//! Canonical text rendering.
//!
//! The canonical form is what the execution engine accepts as a condition, so the output
//! must be byte-exact. Grouping follows the tree shape: only [`Expr::Paren`] adds
//! parentheses.

use crate::{
    ast::{DataType, Expr, VarRef},
    statement::{LogPipeStatement, Query, UnnestClause},
};

/// Types with a canonical textual form.
pub trait Canonical {
    /// Appends the canonical form to `out`.
    fn render(&self, out: &mut String);

    /// Returns the canonical form as a new string.
    fn to_canonical_string(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }
}

/// Pushes `value` wrapped in `quote`, escaping embedded quote characters.
fn push_quoted(out: &mut String, value: &str, quote: char) {
    out.push(quote);
    for ch in value.chars() {
        if ch == quote {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(quote);
}

impl Canonical for VarRef {
    fn render(&self, out: &mut String) {
        match self.data_type {
            DataType::String => {
                out.push_str(&self.name);
                out.push_str("::string");
            }
            DataType::Unknown => push_quoted(out, &self.name, '"'),
        }
    }
}

impl Canonical for Expr {
    fn render(&self, out: &mut String) {
        match self {
            Self::Binary { op, lhs, rhs } => {
                lhs.render(out);
                out.push(' ');
                out.push_str(op.symbol());
                out.push(' ');
                rhs.render(out);
            }
            Self::Paren(inner) => {
                out.push('(');
                inner.render(out);
                out.push(')');
            }
            Self::VarRef(var) => var.render(out),
            Self::StringLiteral(value) => push_quoted(out, value, '\''),
            Self::Wildcard => out.push('*'),
            Self::Call { name, args } => {
                out.push_str(name);
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.render(out);
                }
                out.push(')');
            }
        }
    }
}

impl Canonical for UnnestClause {
    fn render(&self, out: &mut String) {
        out.push_str("UNNEST(");
        self.parse_func().render(out);
        out.push_str(") AS(");
        out.push_str(&self.destination_columns.join(", "));
        out.push(')');
    }
}

impl Canonical for LogPipeStatement {
    fn render(&self, out: &mut String) {
        if let Some(condition) = &self.condition {
            condition.render(out);
        }
        if let Some(unnest) = &self.unnest {
            out.push('|');
            unnest.render(out);
        }
    }
}

impl Canonical for Query {
    fn render(&self, out: &mut String) {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            statement.render(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DEFAULT_FIELD, Op};

    fn content(value: &str) -> Expr {
        Expr::match_phrase(VarRef::string(DEFAULT_FIELD), value)
    }

    fn unnest(columns: &[&str]) -> UnnestClause {
        UnnestClause {
            source: VarRef::string("tags"),
            pattern: "([a-z]+):([a-z]+)".into(),
            destination_columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn typed_and_untyped_fields() {
        assert_eq!(VarRef::string("host").to_canonical_string(), "host::string");
        assert_eq!(VarRef::untyped("field").to_canonical_string(), "\"field\"");
    }

    #[test]
    fn match_phrase() {
        assert_eq!(
            content("get").to_canonical_string(),
            "content::string MATCHPHRASE 'get'"
        );
    }

    #[test]
    fn not_empty() {
        assert_eq!(
            Expr::not_empty(VarRef::string(DEFAULT_FIELD)).to_canonical_string(),
            "content::string != ''"
        );
    }

    #[test]
    fn comparisons() {
        let field = || Expr::VarRef(VarRef::untyped("field"));
        let expr = Expr::and(
            Expr::binary(Op::Gte, field(), Expr::string("10")),
            Expr::binary(Op::Lt, field(), Expr::string("100")),
        );
        assert_eq!(
            expr.to_canonical_string(),
            "\"field\" >= '10' AND \"field\" < '100'"
        );
    }

    #[test]
    fn no_implicit_parentheses() {
        let expr = Expr::and(Expr::or(content("a"), content("b")), content("c"));
        assert_eq!(
            expr.to_canonical_string(),
            "content::string MATCHPHRASE 'a' OR content::string MATCHPHRASE 'b' \
             AND content::string MATCHPHRASE 'c'"
        );
    }

    #[test]
    fn explicit_parentheses() {
        let expr = Expr::and(Expr::paren(Expr::or(content("a"), content("b"))), content("c"));
        assert_eq!(
            expr.to_canonical_string(),
            "(content::string MATCHPHRASE 'a' OR content::string MATCHPHRASE 'b') \
             AND content::string MATCHPHRASE 'c'"
        );
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(Expr::string("it's").to_canonical_string(), "'it\\'s'");
        assert_eq!(
            VarRef::untyped("a\"b").to_canonical_string(),
            "\"a\\\"b\""
        );
    }

    #[test]
    fn call_arguments() {
        let call = Expr::call("f", vec![Expr::string("a"), Expr::Wildcard]);
        assert_eq!(call.to_canonical_string(), "f('a', *)");
    }

    #[test]
    fn unnest_clause() {
        assert_eq!(
            unnest(&["key1", "value1"]).to_canonical_string(),
            "UNNEST(match_all(\"([a-z]+):([a-z]+)\", tags::string)) AS(key1, value1)"
        );
    }

    #[test]
    fn statement_with_condition_and_unnest() {
        let statement = LogPipeStatement {
            condition: Some(content("get")),
            unnest: Some(unnest(&["key1"])),
        };
        assert_eq!(
            statement.to_canonical_string(),
            "content::string MATCHPHRASE 'get'|UNNEST(match_all(\"([a-z]+):([a-z]+)\", \
             tags::string)) AS(key1)"
        );
    }

    #[test]
    fn statement_without_condition_has_leading_pipe() {
        let statement = LogPipeStatement::from_unnest(unnest(&["key1"]));
        assert!(statement.to_canonical_string().starts_with("|UNNEST("));
    }

    #[test]
    fn statement_without_unnest_has_no_pipe() {
        let statement = LogPipeStatement::from_condition(content("a"));
        assert_eq!(
            statement.to_canonical_string(),
            "content::string MATCHPHRASE 'a'"
        );
    }

    #[test]
    fn query_joins_statements() {
        let query = Query {
            statements: vec![
                LogPipeStatement::from_condition(content("a")),
                LogPipeStatement::from_condition(content("b")),
            ],
        };
        assert_eq!(
            query.to_canonical_string(),
            "content::string MATCHPHRASE 'a';content::string MATCHPHRASE 'b'"
        );
    }
}
