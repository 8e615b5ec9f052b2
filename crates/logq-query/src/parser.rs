//! Query parser.
//!
//! Parses a token stream into a [`LogPipeStatement`] using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! statement   → clause ("|" clause)*
//! clause      → unnest | condition
//! condition   → and_chain ("OR" and_chain)*
//! and_chain   → primary ("AND"? primary)*
//! primary     → "(" condition ")" | term
//! term        → field ":" value
//!             | field "in" ("(" | "[") bound bound (")" | "]")
//!             | field ("<" | "<=" | ">" | ">=") bound
//!             | value
//! unnest      → "EXTRACT" "(" term ")" "AS" "(" column ("," column)* ")"
//! field       → IDENT | STRING
//! value       → IDENT | STRING | "*"
//! bound       → IDENT | STRING
//! column      → IDENT | STRING
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. AND (explicit keyword or implicit, between adjacent terms)
//! 3. OR
//! 4. Pipe: `|`
//!
//! Every binary level is left-associative.

use crate::{
    ast::{DEFAULT_FIELD, Expr, Op, VarRef},
    error::{ParseError, SemanticError, SyntaxError},
    lexer::{SpannedToken, Token, TokenKind, is_field_name, tokenize_spanned},
    statement::{LogPipeStatement, Query, UnnestClause},
};

/// Tokens that can start a primary expression.
const PRIMARY_START: &[TokenKind] = &[
    TokenKind::Ident,
    TokenKind::StringLit,
    TokenKind::Wildcard,
    TokenKind::LParen,
];

/// Tokens that can start a pipe clause.
const CLAUSE_START: &[TokenKind] = &[
    TokenKind::Ident,
    TokenKind::StringLit,
    TokenKind::Wildcard,
    TokenKind::LParen,
    TokenKind::Extract,
];

/// Tokens accepted after a field separator.
const VALUE: &[TokenKind] = &[TokenKind::Ident, TokenKind::StringLit, TokenKind::Wildcard];

/// Tokens accepted as range bounds, comparison operands and column names.
const NAME: &[TokenKind] = &[TokenKind::Ident, TokenKind::StringLit];

/// Tokens that open a range.
const RANGE_OPEN: &[TokenKind] = &[TokenKind::LParen, TokenKind::LBracket];

/// Tokens that close a range.
const RANGE_CLOSE: &[TokenKind] = &[TokenKind::RParen, TokenKind::RBracket];

/// Tokens accepted inside a group after a complete condition.
const GROUP_CONTINUE: &[TokenKind] = &[TokenKind::RParen, TokenKind::Or, TokenKind::And];

/// Tokens accepted after a complete clause.
const STATEMENT_CONTINUE: &[TokenKind] = &[
    TokenKind::Or,
    TokenKind::And,
    TokenKind::Pipe,
    TokenKind::End,
];

/// Deepest parenthesized nesting accepted before parsing stops with an error.
pub const MAX_DEPTH: usize = 128;

/// Options that shape the AST built by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Field searched by terms that name no field.
    pub default_field: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            default_field: DEFAULT_FIELD.to_string(),
        }
    }
}

/// Recursive descent parser over the tokens of one input.
///
/// Built fresh for every call to [`LogParser::parse`], so no state survives between inputs.
struct Parser<'a> {
    /// Token stream to parse.
    tokens: Vec<SpannedToken>,
    /// Current position in token stream.
    position: usize,
    /// Byte length of the input, reported as the position of the end of the query.
    input_len: usize,
    /// Field used by terms without a field prefix.
    default_field: &'a str,
    /// Number of groups currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<SpannedToken>, input_len: usize, default_field: &'a str) -> Self {
        Self {
            tokens,
            position: 0,
            input_len,
            default_field,
            depth: 0,
        }
    }

    /// Parses the whole token stream into one statement.
    fn parse(mut self) -> Result<LogPipeStatement, ParseError> {
        let statement = self.parse_pipe_chain()?;

        if self.position < self.tokens.len() {
            return Err(self.unexpected(STATEMENT_CONTINUE).into());
        }

        Ok(statement)
    }

    /// Parses: statement → clause ("|" clause)*
    fn parse_pipe_chain(&mut self) -> Result<LogPipeStatement, ParseError> {
        let mut statement = self.parse_clause()?;

        while self.check(TokenKind::Pipe) {
            self.advance(); // consume |
            let next = self.parse_clause()?;
            statement = statement.merge(next)?;
        }

        Ok(statement)
    }

    /// Parses: clause → unnest | condition
    fn parse_clause(&mut self) -> Result<LogPipeStatement, ParseError> {
        match self.peek_kind() {
            TokenKind::Extract => Ok(LogPipeStatement::from_unnest(self.parse_unnest()?)),
            kind if PRIMARY_START.contains(&kind) => {
                Ok(LogPipeStatement::from_condition(self.parse_condition()?))
            }
            _ => Err(self.unexpected(CLAUSE_START).into()),
        }
    }

    /// Parses: condition → and_chain ("OR" and_chain)*
    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and_chain()?;

        while self.check(TokenKind::Or) {
            self.advance(); // consume OR
            let right = self.parse_and_chain()?;
            left = Expr::or(left, right);
        }

        Ok(left)
    }

    /// Parses: and_chain → primary ("AND"? primary)*
    ///
    /// Juxtaposed terms build the same node as an explicit AND.
    fn parse_and_chain(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;

        loop {
            if self.check(TokenKind::And) {
                self.advance(); // consume AND
            } else if !self.can_start_primary() {
                break;
            }
            let right = self.parse_primary()?;
            left = Expr::and(left, right);
        }

        Ok(left)
    }

    /// Checks if the current token can start a primary expression.
    fn can_start_primary(&self) -> bool {
        PRIMARY_START.contains(&self.peek_kind())
    }

    /// Parses: primary → "(" condition ")" | term
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::LParen => {
                if self.depth >= MAX_DEPTH {
                    return Err(self.too_deep().into());
                }
                self.advance(); // consume (
                self.depth += 1;
                let inner = self.parse_condition()?;
                self.expect(TokenKind::RParen, GROUP_CONTINUE)?;
                self.depth -= 1;
                Ok(Expr::paren(inner))
            }
            TokenKind::Ident | TokenKind::StringLit | TokenKind::Wildcard => self.parse_term(),
            _ => Err(self.unexpected(PRIMARY_START).into()),
        }
    }

    /// Parses a single filter term.
    ///
    /// The token after a field name decides the term's shape; without a separator the
    /// name itself is a value searched in the default field.
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let Some(text) = self.peek().and_then(Token::text).map(str::to_owned) else {
            if self.check(TokenKind::Wildcard) {
                self.advance();
                return Ok(Expr::not_empty(VarRef::string(self.default_field)));
            }
            return Err(self.unexpected(VALUE).into());
        };
        self.advance();

        match self.peek_kind() {
            TokenKind::Colon => {
                self.advance(); // consume :
                self.parse_field_value(text)
            }
            TokenKind::In => {
                self.advance(); // consume in
                self.parse_range(text)
            }
            TokenKind::Lt => self.parse_comparison(text, Op::Lt),
            TokenKind::Lte => self.parse_comparison(text, Op::Lte),
            TokenKind::Gt => self.parse_comparison(text, Op::Gt),
            TokenKind::Gte => self.parse_comparison(text, Op::Gte),
            _ => Ok(Expr::match_phrase(VarRef::string(self.default_field), text)),
        }
    }

    /// Parses the value after `field:`.
    fn parse_field_value(&mut self, field: String) -> Result<Expr, ParseError> {
        let field = typed_field(field)?;
        match self.peek() {
            Some(Token::Wildcard) => {
                self.advance();
                Ok(Expr::not_empty(field))
            }
            Some(Token::Ident(value) | Token::StringLit(value)) => {
                let expr = Expr::match_phrase(field, value.clone());
                self.advance();
                Ok(expr)
            }
            _ => Err(self.unexpected(VALUE).into()),
        }
    }

    /// Parses the bounds after `field in`.
    ///
    /// A parenthesis excludes its bound and a bracket includes it. The field is left
    /// untyped so bounds compare as plain text.
    fn parse_range(&mut self, field: String) -> Result<Expr, ParseError> {
        let lower_op = match self.peek_kind() {
            TokenKind::LParen => Op::Gt,
            TokenKind::LBracket => Op::Gte,
            _ => return Err(self.unexpected(RANGE_OPEN).into()),
        };
        self.advance();

        let lower = self.expect_name()?;
        let upper = self.expect_name()?;

        let upper_op = match self.peek_kind() {
            TokenKind::RParen => Op::Lt,
            TokenKind::RBracket => Op::Lte,
            _ => return Err(self.unexpected(RANGE_CLOSE).into()),
        };
        self.advance();

        let field = VarRef::untyped(field);
        Ok(Expr::and(
            Expr::binary(lower_op, Expr::VarRef(field.clone()), Expr::string(lower)),
            Expr::binary(upper_op, Expr::VarRef(field), Expr::string(upper)),
        ))
    }

    /// Parses `field <op> bound`, with the current token being the operator.
    fn parse_comparison(&mut self, field: String, op: Op) -> Result<Expr, ParseError> {
        self.advance(); // consume operator
        let bound = self.expect_name()?;
        Ok(Expr::binary(
            op,
            Expr::VarRef(typed_field(field)?),
            Expr::string(bound),
        ))
    }

    /// Parses: unnest → "EXTRACT" "(" term ")" "AS" "(" column ("," column)* ")"
    ///
    /// The argument goes through the ordinary term grammar, so `field:"regex"` and a bare
    /// `"regex"` parse like filter terms and are then reinterpreted as source and pattern.
    fn parse_unnest(&mut self) -> Result<UnnestClause, ParseError> {
        self.expect(TokenKind::Extract, &[TokenKind::Extract])?;
        self.expect(TokenKind::LParen, &[TokenKind::LParen])?;
        let term = self.parse_term()?;
        self.expect(TokenKind::RParen, &[TokenKind::RParen])?;
        self.expect(TokenKind::As, &[TokenKind::As])?;
        self.expect(TokenKind::LParen, &[TokenKind::LParen])?;

        let mut columns = vec![self.expect_name()?.trim().to_string()];
        while self.check(TokenKind::Comma) {
            self.advance(); // consume ,
            columns.push(self.expect_name()?.trim().to_string());
        }

        self.expect(TokenKind::RParen, &[TokenKind::Comma, TokenKind::RParen])?;

        Ok(UnnestClause::from_term(term, columns)?)
    }

    /// Consumes an identifier or string and returns its text.
    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.peek().and_then(Token::text) {
            Some(text) => {
                let text = text.to_string();
                self.advance();
                Ok(text)
            }
            None => Err(self.unexpected(NAME).into()),
        }
    }

    /// Consumes a token of the given kind or fails with the accepted set.
    fn expect(&mut self, kind: TokenKind, expected: &[TokenKind]) -> Result<(), ParseError> {
        if !self.check(kind) {
            return Err(self.unexpected(expected).into());
        }
        self.advance();
        Ok(())
    }

    /// Builds a syntax error for the current token.
    fn unexpected(&self, expected: &[TokenKind]) -> SyntaxError {
        let err = match self.tokens.get(self.position) {
            Some(spanned) => {
                let message = match spanned.token.text() {
                    Some(_) => format!("unexpected {} {}", spanned.token.kind(), spanned.token),
                    None => format!("unexpected {}", spanned.token),
                };
                SyntaxError::new(
                    message,
                    Some(self.position),
                    Some(spanned.offset),
                    spanned.token.kind(),
                )
            }
            None => SyntaxError::new(
                "unexpected end of query",
                None,
                Some(self.input_len),
                TokenKind::End,
            ),
        };
        err.expecting(expected)
    }

    /// Builds the error for a group opened past [`MAX_DEPTH`].
    fn too_deep(&self) -> SyntaxError {
        SyntaxError::new(
            format!("groups nested more than {MAX_DEPTH} deep"),
            Some(self.position),
            self.tokens.get(self.position).map(|spanned| spanned.offset),
            TokenKind::LParen,
        )
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|spanned| &spanned.token)
    }

    /// Returns the kind of the current token, `End` past the last one.
    fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::End, Token::kind)
    }

    /// Checks if the current token has the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Returns the string-typed reference for a field named in a term.
///
/// Typed references render bare, so the name must lex back as a single field name.
fn typed_field(name: String) -> Result<VarRef, SemanticError> {
    if is_field_name(&name) {
        Ok(VarRef::string(name))
    } else {
        Err(SemanticError::InvalidFieldName { field: name })
    }
}

/// Parses log search queries.
///
/// Holds only immutable options; every call tokenizes and parses its input from scratch
/// and returns a [`Query`] scoped to that input.
#[derive(Debug, Clone, Default)]
pub struct LogParser {
    /// Options applied to every parse.
    options: ParserOptions,
}

impl LogParser {
    /// Creates a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parses a query string into a single-statement [`Query`].
    pub fn parse(&self, input: &str) -> Result<Query, ParseError> {
        let tokens = tokenize_spanned(input)?;
        Parser::new(tokens, input.len(), &self.options.default_field)
            .parse()
            .map(Query::single)
            .map_err(|err| err.with_query(input))
    }
}

/// Parses a query string into an AST with default options.
///
/// Returns a [`Query`] holding exactly one statement, or a [`ParseError`] describing the
/// first lexical, syntactic or semantic problem.
pub fn parse(input: &str) -> Result<Query, ParseError> {
    LogParser::new().parse(input)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::{
        error::{ParseErrorKind, SemanticError},
        render::Canonical,
    };

    fn condition(input: &str) -> Expr {
        let query = parse(input).unwrap();
        assert_eq!(query.statements.len(), 1);
        query.statements[0].condition.clone().unwrap()
    }

    fn content(value: &str) -> Expr {
        Expr::match_phrase(VarRef::string(DEFAULT_FIELD), value)
    }

    fn field(name: &str, value: &str) -> Expr {
        Expr::match_phrase(VarRef::string(name), value)
    }

    fn and(lhs: Expr, rhs: Expr) -> Expr {
        Expr::and(lhs, rhs)
    }

    fn or(lhs: Expr, rhs: Expr) -> Expr {
        Expr::or(lhs, rhs)
    }

    fn syntax_error(input: &str) -> SyntaxError {
        match parse(input).unwrap_err().kind {
            ParseErrorKind::Syntax(err) => err,
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn single_word() {
        assert_eq!(condition("127.0.0.10"), content("127.0.0.10"));
    }

    #[test]
    fn quoted_phrase_is_one_term() {
        assert_eq!(condition("\"get iamges\""), content("get iamges"));
    }

    #[test]
    fn juxtaposition_is_and() {
        assert_eq!(condition("get iamges"), and(content("get"), content("iamges")));
    }

    #[test]
    fn implicit_and_matches_explicit_and() {
        assert_eq!(condition("a b"), condition("a AND b"));
        assert_eq!(condition("a b"), condition("a and b"));
    }

    #[test]
    fn and_is_left_associative() {
        assert_eq!(
            condition("a b AND c"),
            and(and(content("a"), content("b")), content("c"))
        );
    }

    #[test]
    fn or_binds_looser_than_and() {
        assert_eq!(
            condition("a OR b c"),
            or(content("a"), and(content("b"), content("c")))
        );
        assert_eq!(
            condition("a b or c"),
            or(and(content("a"), content("b")), content("c"))
        );
    }

    #[test]
    fn or_is_left_associative() {
        assert_eq!(
            condition("a OR b OR c"),
            or(or(content("a"), content("b")), content("c"))
        );
    }

    #[test]
    fn parentheses_are_preserved() {
        assert_eq!(
            condition("(a OR b) c"),
            and(Expr::paren(or(content("a"), content("b"))), content("c"))
        );
    }

    #[test]
    fn nested_groups() {
        assert_eq!(
            condition("((a))"),
            Expr::paren(Expr::paren(content("a")))
        );
    }

    #[test]
    fn field_term() {
        assert_eq!(condition("host:127.0.0.10"), field("host", "127.0.0.10"));
        assert_eq!(condition("host: 127.0.0.10"), field("host", "127.0.0.10"));
        assert_eq!(condition("time:10:00:00"), field("time", "10:00:00"));
    }

    #[test]
    fn quoted_field_and_value() {
        assert_eq!(condition("\"host\":\"a b\""), field("host", "a b"));
    }

    #[test]
    fn quoted_field_must_be_a_field_name() {
        let cases = [
            ("\"my field\":x", "my field"),
            ("\"a b\"<3", "a b"),
            ("EXTRACT(\"x y\":\"(a)\") AS(k)", "x y"),
        ];
        for (input, name) in cases {
            let err = parse(input).unwrap_err();
            assert_eq!(
                err.kind,
                ParseErrorKind::Semantic(SemanticError::InvalidFieldName { field: name.into() }),
                "{input}"
            );
        }
    }

    #[test]
    fn quoted_range_field_stays_untyped() {
        let field = || Expr::VarRef(VarRef::untyped("my size"));
        assert_eq!(
            condition("\"my size\" in (1 9)"),
            and(
                Expr::binary(Op::Gt, field(), Expr::string("1")),
                Expr::binary(Op::Lt, field(), Expr::string("9")),
            )
        );
    }

    #[test]
    fn wildcard_terms() {
        assert_eq!(
            condition("*"),
            Expr::not_empty(VarRef::string(DEFAULT_FIELD))
        );
        assert_eq!(condition("host:*"), Expr::not_empty(VarRef::string("host")));
    }

    #[test]
    fn range_term_shape() {
        let field = || Expr::VarRef(VarRef::untyped("size"));
        assert_eq!(
            condition("size in [1 9)"),
            and(
                Expr::binary(Op::Gte, field(), Expr::string("1")),
                Expr::binary(Op::Lt, field(), Expr::string("9")),
            )
        );
    }

    #[test]
    fn comparison_term_shape() {
        assert_eq!(
            condition("a>=100"),
            Expr::binary(
                Op::Gte,
                Expr::VarRef(VarRef::string("a")),
                Expr::string("100")
            )
        );
    }

    #[test]
    fn extract_only() {
        let query = parse("EXTRACT(\"([a-z]+)\") AS(key1)").unwrap();
        let statement = query.statement().unwrap();
        assert_eq!(statement.condition, None);
        let unnest = statement.unnest.as_ref().unwrap();
        assert_eq!(unnest.source, VarRef::string(DEFAULT_FIELD));
        assert_eq!(unnest.pattern, "([a-z]+)");
        assert_eq!(unnest.destination_columns, vec!["key1".to_string()]);
    }

    #[test]
    fn extract_with_field_and_trimmed_columns() {
        let query = parse("EXTRACT(tags:\"(a):(b)\") AS(\" k \",v,v)").unwrap();
        let unnest = query.statements[0].unnest.clone().unwrap();
        assert_eq!(unnest.source, VarRef::string("tags"));
        assert_eq!(unnest.destination_columns, vec!["k", "v", "v"]);
    }

    #[test]
    fn pipe_merges_conditions() {
        let query = parse("a|b|c").unwrap();
        assert_eq!(
            query.statements[0].condition,
            Some(and(and(content("a"), content("b")), content("c")))
        );
    }

    #[test]
    fn multiple_extract_rejected() {
        let err = parse("EXTRACT(\"(a)\") AS(x)|EXTRACT(\"(b)\") AS(y)").unwrap_err();
        assert!(err.is_multiple_extract());
        assert_eq!(err.message(), "only one extract statement is supported");
    }

    #[test]
    fn wildcard_extract_pattern_rejected() {
        let err = parse("EXTRACT(*) AS(x)").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::Semantic(SemanticError::InvalidExtractPattern { .. })
        ));
    }

    #[test]
    fn range_extract_pattern_rejected() {
        let err = parse("EXTRACT(f in (1 2)) AS(x)").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::Semantic(SemanticError::InvalidExtractPattern { .. })
        ));
    }

    #[test]
    fn default_field_option() {
        let parser = LogParser::with_options(ParserOptions {
            default_field: "message".into(),
        });
        let query = parser.parse("get|EXTRACT(\"(x)\") AS(k)").unwrap();
        assert_eq!(
            query.to_canonical_string(),
            "message::string MATCHPHRASE 'get'|UNNEST(match_all(\"(x)\", message::string)) AS(k)"
        );
    }

    #[test]
    fn each_parse_starts_fresh() {
        let parser = LogParser::new();
        let first = parser.parse("get|EXTRACT(\"(a)\") AS(k)").unwrap();
        let second = parser.parse("host:x").unwrap();
        let third = parser.parse("EXTRACT(\"(b)\") AS(v)").unwrap();

        assert_eq!(first.statements.len(), 1);
        assert_eq!(second.statements.len(), 1);
        assert_eq!(second.statements[0].condition, Some(field("host", "x")));
        assert_eq!(second.statements[0].unnest, None);
        assert_eq!(third.statements[0].condition, None);
        assert_eq!(third.statements[0].unnest.as_ref().unwrap().pattern, "(b)");
    }

    #[test]
    fn error_empty_query() {
        let err = syntax_error("   ");
        assert_eq!(err.found, TokenKind::End);
        assert_eq!(err.message, "unexpected end of query");
        assert!(err.expected.contains(&TokenKind::Extract));
    }

    #[test]
    fn error_unclosed_paren() {
        let err = syntax_error("(a b");
        assert_eq!(err.found, TokenKind::End);
        assert_eq!(err.position, Some(4));
        assert!(err.expected.contains(&TokenKind::RParen));
    }

    #[test]
    fn error_unexpected_rparen() {
        let err = syntax_error("a)");
        assert_eq!(err.found, TokenKind::RParen);
        assert_eq!(err.token_index, Some(1));
        assert_eq!(err.position, Some(1));
        assert!(err.expected.contains(&TokenKind::Pipe));
    }

    #[test]
    fn error_or_at_start() {
        let err = syntax_error("OR a");
        assert_eq!(err.found, TokenKind::Or);
        assert_eq!(err.message, "unexpected OR");
    }

    #[test]
    fn error_or_at_end() {
        let err = syntax_error("a OR");
        assert_eq!(err.message, "unexpected end of query");
    }

    #[test]
    fn error_field_without_value() {
        let err = syntax_error("host:");
        assert_eq!(err.expected, VALUE.to_vec());
    }

    #[test]
    fn error_extract_inside_condition() {
        let err = syntax_error("a EXTRACT(\"x\") AS(k)");
        assert_eq!(err.found, TokenKind::Extract);
    }

    #[test]
    fn error_extract_without_columns() {
        let err = syntax_error("EXTRACT(\"x\") AS()");
        assert_eq!(err.found, TokenKind::RParen);
        assert_eq!(err.expected, NAME.to_vec());
    }

    #[test]
    fn unclosed_range_is_an_unclosed_group() {
        let err = syntax_error("f in (1 2");
        assert_eq!(err.found, TokenKind::End);
        assert_eq!(err.expected, GROUP_CONTINUE.to_vec());
    }

    #[test]
    fn in_before_group_is_a_term() {
        assert_eq!(
            condition("sign in (web)"),
            and(
                and(content("sign"), content("in")),
                Expr::paren(content("web"))
            )
        );
    }

    #[test]
    fn error_nesting_too_deep() {
        let input = format!("{}a{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        let err = syntax_error(&input);
        assert_eq!(err.found, TokenKind::LParen);
        assert_eq!(err.token_index, Some(MAX_DEPTH));
        assert_eq!(err.position, Some(MAX_DEPTH));
    }

    #[test]
    fn nesting_at_limit_parses() {
        let input = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse(&input).is_ok());
    }

    #[test]
    fn error_names_identifier() {
        let err = syntax_error("a|:b");
        assert_eq!(err.message, "unexpected ':'");
        let err = syntax_error("EXTRACT(\"x\") key");
        assert_eq!(err.message, "unexpected IDENT key");
    }

    #[test]
    fn error_lex_is_reported() {
        let err = parse("a \"b").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Lex(_)));
        assert_eq!(err.position(), Some(2));
        assert_eq!(err.query.as_deref(), Some("a \"b"));
    }

    #[test]
    fn error_carries_query() {
        let err = parse("a)").unwrap_err();
        assert_eq!(err.query.as_deref(), Some("a)"));
    }

    #[test]
    fn performance_many_queries() {
        // Verify parsing is fast enough for practical use
        let queries = [
            "get",
            "get iamges and process",
            "\"get iamges\" or request:process",
            "(2023-06-13 OR 127.0.0.10) AND time:10:00:00",
            "field in [10 100] and a<100",
            "get iamges|EXTRACT(tags:\"([a-z]+):([a-z]+)\") AS(key1, value1)|key1:http",
        ];

        let start = Instant::now();
        for _ in 0..1000 {
            for query in &queries {
                let _ = parse(query).unwrap();
            }
        }
        let elapsed = start.elapsed();

        assert!(
            elapsed.as_millis() < 2000,
            "Parsing 6,000 queries took {:?}, expected < 2s",
            elapsed
        );
    }
}
