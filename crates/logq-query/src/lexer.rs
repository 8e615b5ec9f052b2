//! Query lexer (tokenizer).
//!
//! Converts a log search string into a stream of tokens for the parser.

use std::{fmt, iter::Peekable, str::CharIndices};

use serde::{Deserialize, Serialize};

use crate::error::LexError;

/// A token in the log search language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// The EXTRACT keyword.
    Extract,

    /// The AS keyword.
    As,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// Left square bracket (inclusive range bound).
    LBracket,

    /// Right square bracket (inclusive range bound).
    RBracket,

    /// A bare word: keyword, field name or unquoted value.
    Ident(String),

    /// A quoted string (the quotes are stripped, content preserved).
    StringLit(String),

    /// The OR keyword.
    Or,

    /// The AND keyword.
    And,

    /// The pipe separator between clauses.
    Pipe,

    /// Field separator.
    Colon,

    /// Column list separator.
    Comma,

    /// A bare `*`.
    Wildcard,

    /// The `in` keyword introducing a range.
    In,

    /// `<`
    Lt,

    /// `<=`
    Lte,

    /// `>`
    Gt,

    /// `>=`
    Gte,
}

impl Token {
    /// Returns the payload-free kind of this token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Extract => TokenKind::Extract,
            Self::As => TokenKind::As,
            Self::LParen => TokenKind::LParen,
            Self::RParen => TokenKind::RParen,
            Self::LBracket => TokenKind::LBracket,
            Self::RBracket => TokenKind::RBracket,
            Self::Ident(_) => TokenKind::Ident,
            Self::StringLit(_) => TokenKind::StringLit,
            Self::Or => TokenKind::Or,
            Self::And => TokenKind::And,
            Self::Pipe => TokenKind::Pipe,
            Self::Colon => TokenKind::Colon,
            Self::Comma => TokenKind::Comma,
            Self::Wildcard => TokenKind::Wildcard,
            Self::In => TokenKind::In,
            Self::Lt => TokenKind::Lt,
            Self::Lte => TokenKind::Lte,
            Self::Gt => TokenKind::Gt,
            Self::Gte => TokenKind::Gte,
        }
    }

    /// Returns the literal text carried by identifiers and strings.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Ident(text) | Self::StringLit(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(text) => write!(f, "{text}"),
            Self::StringLit(text) => write!(f, "\"{text}\""),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// The kind of a token, without its payload.
///
/// Syntax errors report the found and expected tokens by kind. `End` stands for the end of
/// the input, which the token stream itself represents by running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// `EXTRACT`
    Extract,
    /// `AS`
    As,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// Bare word.
    Ident,
    /// Quoted string.
    StringLit,
    /// `OR`
    Or,
    /// `AND`
    And,
    /// `|`
    Pipe,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `*`
    Wildcard,
    /// `in`
    In,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// End of input.
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extract => "EXTRACT",
            Self::As => "AS",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Ident => "IDENT",
            Self::StringLit => "STRING",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Pipe => "'|'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Wildcard => "'*'",
            Self::In => "IN",
            Self::Lt => "'<'",
            Self::Lte => "'<='",
            Self::Gt => "'>'",
            Self::Gte => "'>='",
            Self::End => "end of query",
        };
        f.write_str(name)
    }
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Byte offset of the first character of the token in the input.
    pub offset: usize,
}

/// Returns true for characters that end an unquoted word.
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | '|' | ',' | '"' | '<' | '>')
}

/// Returns true if `word` may name a field, so that a following colon separates it from
/// its value.
pub fn is_field_name(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '@'))
}

/// Returns true if `rest` is an opener, two bounds and a closer, with optional spacing.
///
/// Anything else after `in` leaves it an ordinary word, so `sign in (web)` stays a
/// search for three values.
fn is_range(rest: &str) -> bool {
    let Some(rest) = rest.trim_start().strip_prefix(['(', '[']) else {
        return false;
    };
    skip_bound(rest)
        .and_then(skip_bound)
        .is_some_and(|rest| rest.trim_start().starts_with([')', ']']))
}

/// Skips leading spaces and one range bound, returning what follows it.
///
/// A bound is a quoted string or a single plain word that lexes as an identifier.
fn skip_bound(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();

    if let Some(quoted) = rest.strip_prefix('"') {
        let mut chars = quoted.char_indices().peekable();
        while let Some((i, ch)) = chars.next() {
            match ch {
                '"' => return Some(&quoted[i + 1..]),
                '\\' if matches!(chars.peek(), Some(&(_, '"'))) => {
                    chars.next();
                }
                _ => {}
            }
        }
        return None;
    }

    let end = rest
        .find(|c: char| is_delimiter(c) || c.is_control())
        .unwrap_or(rest.len());
    let word = &rest[..end];
    if word.is_empty() || word == "*" || is_keyword(word) {
        return None;
    }
    if word
        .find(':')
        .is_some_and(|colon| is_field_name(&word[..colon]))
    {
        return None;
    }
    Some(&rest[end..])
}

/// Returns true for words the lexer turns into keyword tokens outside a value position.
fn is_keyword(word: &str) -> bool {
    matches!(word, "EXTRACT" | "AS")
        || word.eq_ignore_ascii_case("AND")
        || word.eq_ignore_ascii_case("OR")
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
    /// The previously emitted token, used for context-sensitive words.
    previous: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            previous: None,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();

        while let Some(spanned) = self.next_token()? {
            self.previous = Some(spanned.token.clone());
            tokens.push(spanned);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Result<Option<SpannedToken>, LexError> {
        self.skip_whitespace();

        let Some(&(offset, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '"' => self.read_string(offset)?,
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '|' => self.single(Token::Pipe),
            ',' => self.single(Token::Comma),
            ':' => self.single(Token::Colon),
            '<' => self.read_comparison(Token::Lt, Token::Lte),
            '>' => self.read_comparison(Token::Gt, Token::Gte),
            c if c.is_control() => {
                return Err(self.error_at(format!("unexpected character {c:?}"), offset));
            }
            _ => self.read_word(offset)?,
        };

        Ok(Some(SpannedToken { token, offset }))
    }

    /// Consumes one character and returns the given token.
    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Reads `<`/`>` with an optional trailing `=`.
    fn read_comparison(&mut self, bare: Token, with_eq: Token) -> Token {
        self.advance();
        if matches!(self.chars.peek(), Some(&(_, '='))) {
            self.advance();
            with_eq
        } else {
            bare
        }
    }

    /// Reads a double-quoted string.
    fn read_string(&mut self, start: usize) -> Result<Token, LexError> {
        self.advance(); // opening quote

        let mut content = String::new();

        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(Token::StringLit(content)),
                Some((_, '\\')) if matches!(self.chars.peek(), Some(&(_, '"'))) => {
                    content.push('"');
                    self.advance();
                }
                Some((_, ch)) => content.push(ch),
                None => return Err(self.error_at("unclosed quote", start)),
            }
        }
    }

    /// Reads an unquoted word and classifies it.
    fn read_word(&mut self, start: usize) -> Result<Token, LexError> {
        let value_position = matches!(self.previous, Some(Token::Colon));
        let mut end = start;

        while let Some(&(offset, ch)) = self.chars.peek() {
            if is_delimiter(ch) {
                break;
            }
            if ch.is_control() {
                return Err(self.error_at(format!("unexpected character {ch:?}"), offset));
            }
            if ch == ':' && !value_position && is_field_name(&self.input[start..offset]) {
                break;
            }
            self.advance();
            end = offset + ch.len_utf8();
        }

        let word = &self.input[start..end];

        if word == "*" {
            return Ok(Token::Wildcard);
        }
        if value_position {
            return Ok(Token::Ident(word.to_string()));
        }

        let token = match word {
            "EXTRACT" => Token::Extract,
            "AS" => Token::As,
            w if w.eq_ignore_ascii_case("AND") => Token::And,
            w if w.eq_ignore_ascii_case("OR") => Token::Or,
            w if w.eq_ignore_ascii_case("IN") && self.range_follows() => Token::In,
            w => Token::Ident(w.to_string()),
        };
        Ok(token)
    }

    /// Checks whether the rest of the input starts with a complete range.
    fn range_follows(&self) -> bool {
        self.chars
            .clone()
            .next()
            .is_some_and(|(offset, _)| is_range(&self.input[offset..]))
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, ch)| ch.is_whitespace()).is_some() {}
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        self.chars.next();
    }
}

/// Tokenizes a query string, keeping the byte offset of each token.
pub fn tokenize_spanned(input: &str) -> Result<Vec<SpannedToken>, LexError> {
    Lexer::new(input).tokenize()
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Ok(tokenize_spanned(input)?
        .into_iter()
        .map(|spanned| spanned.token)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.into())
    }

    fn string(s: &str) -> Token {
        Token::StringLit(s.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(tokenize("  \t ").unwrap(), vec![]);
    }

    #[test]
    fn multiple_words() {
        assert_eq!(
            tokenize("get iamges").unwrap(),
            vec![ident("get"), ident("iamges")]
        );
    }

    #[test]
    fn ambiguous_words_stay_whole() {
        for word in ["127.0.0.10", "2023-06-13", "10:00:00", "/var/log/messages/"] {
            assert_eq!(tokenize(word).unwrap(), vec![ident(word)], "{word}");
        }
    }

    #[test]
    fn field_prefix_splits_on_colon() {
        assert_eq!(
            tokenize("host:127.0.0.10").unwrap(),
            vec![ident("host"), Token::Colon, ident("127.0.0.10")]
        );
    }

    #[test]
    fn value_after_colon_keeps_colons() {
        assert_eq!(
            tokenize("time:10:00:00").unwrap(),
            vec![ident("time"), Token::Colon, ident("10:00:00")]
        );
    }

    #[test]
    fn space_after_colon() {
        assert_eq!(
            tokenize("content: *").unwrap(),
            vec![ident("content"), Token::Colon, Token::Wildcard]
        );
    }

    #[test]
    fn value_position_is_never_a_keyword() {
        assert_eq!(
            tokenize("request:and").unwrap(),
            vec![ident("request"), Token::Colon, ident("and")]
        );
    }

    #[test]
    fn quoted_string_preserves_spaces() {
        assert_eq!(
            tokenize("\"get iamges\"").unwrap(),
            vec![string("get iamges")]
        );
    }

    #[test]
    fn quoted_string_escaped_quote() {
        assert_eq!(
            tokenize(r#""say \"hi\" \d+""#).unwrap(),
            vec![string(r#"say "hi" \d+"#)]
        );
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("host:\"hello").unwrap_err();
        assert_eq!(err.position, 5);
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn control_character_error() {
        let err = tokenize("get\u{7}x").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(err.message.contains("unexpected character"));
    }

    #[test]
    fn boolean_keywords_any_case() {
        assert_eq!(
            tokenize("a AND b and c OR d or e").unwrap(),
            vec![
                ident("a"),
                Token::And,
                ident("b"),
                Token::And,
                ident("c"),
                Token::Or,
                ident("d"),
                Token::Or,
                ident("e"),
            ]
        );
    }

    #[test]
    fn extract_keywords_are_uppercase_only() {
        assert_eq!(
            tokenize("extract as").unwrap(),
            vec![ident("extract"), ident("as")]
        );
        assert_eq!(tokenize("EXTRACT AS").unwrap(), vec![Token::Extract, Token::As]);
    }

    #[test]
    fn extract_clause() {
        assert_eq!(
            tokenize("|EXTRACT(tags:\"([a-z]+):([a-z]+)\") AS(key1,   value1)").unwrap(),
            vec![
                Token::Pipe,
                Token::Extract,
                Token::LParen,
                ident("tags"),
                Token::Colon,
                string("([a-z]+):([a-z]+)"),
                Token::RParen,
                Token::As,
                Token::LParen,
                ident("key1"),
                Token::Comma,
                ident("value1"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn range_tokens() {
        assert_eq!(
            tokenize("field in (10 100]").unwrap(),
            vec![
                ident("field"),
                Token::In,
                Token::LParen,
                ident("10"),
                ident("100"),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn in_without_range_is_a_word() {
        assert_eq!(
            tokenize("log in page").unwrap(),
            vec![ident("log"), ident("in"), ident("page")]
        );
    }

    #[test]
    fn in_before_group_is_a_word() {
        assert_eq!(
            tokenize("sign in (web)").unwrap(),
            vec![
                ident("sign"),
                ident("in"),
                Token::LParen,
                ident("web"),
                Token::RParen,
            ]
        );
        assert_eq!(
            tokenize("logged in (today OR yesterday)").unwrap()[1],
            ident("in")
        );
        assert_eq!(tokenize("user logged in [admin]").unwrap()[2], ident("in"));
    }

    #[test]
    fn range_shape_detection() {
        assert!(is_range(" [10 100)"));
        assert!(is_range("(\"a b\" \"c\\\"d\")"));
        assert!(is_range("(2023-06-13 10:00:00]"));
        assert!(!is_range("(web)"));
        assert!(!is_range("(a b c)"));
        assert!(!is_range("(a OR)"));
        assert!(!is_range("(host:a b)"));
        assert!(!is_range("(a *)"));
        assert!(!is_range("(a \"unclosed)"));
        assert!(!is_range("a b"));
    }

    #[test]
    fn comparison_tokens() {
        assert_eq!(
            tokenize("a<100 b<=1 c>2 d>=3").unwrap(),
            vec![
                ident("a"),
                Token::Lt,
                ident("100"),
                ident("b"),
                Token::Lte,
                ident("1"),
                ident("c"),
                Token::Gt,
                ident("2"),
                ident("d"),
                Token::Gte,
                ident("3"),
            ]
        );
    }

    #[test]
    fn spanned_offsets() {
        let tokens = tokenize_spanned("ab  \"c d\"|x").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 4, 9, 10]);
    }

    #[test]
    fn multibyte_words() {
        assert_eq!(
            tokenize("héllo wörld").unwrap(),
            vec![ident("héllo"), ident("wörld")]
        );
    }

    #[test]
    fn field_name_rules() {
        assert!(is_field_name("content"));
        assert!(is_field_name("_source.host-name"));
        assert!(!is_field_name("10"));
        assert!(!is_field_name(""));
        assert!(!is_field_name("/var"));
    }
}
