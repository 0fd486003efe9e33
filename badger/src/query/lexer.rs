//! Query lexer.
//!
//! Turns a query string into a stream of [`Token`]s. The stream always ends
//! with exactly one terminal token: [`TokenKind::Eof`], or [`TokenKind::Error`]
//! for an unterminated quoted literal.

use std::fmt::{Display, Formatter};

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Error,
    Literal,
    QuotedLiteral,
    Plus,
    Minus,
    Colon,
    Or,
    And,
    To,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Eof => "eof",
            TokenKind::Error => "error",
            TokenKind::Literal => "lit",
            TokenKind::QuotedLiteral => "quoted",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Colon => "colon",
            TokenKind::Or => "or",
            TokenKind::And => "and",
            TokenKind::To => "to",
            TokenKind::LParen => "lparen",
            TokenKind::RParen => "rparen",
            TokenKind::LBracket => "lsq",
            TokenKind::RBracket => "rsq",
        };
        write!(f, "{}", name)
    }
}

/// A token and the slice of the query it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Matched text, quotes included for quoted literals.
    pub text: &'a str,
    /// Byte offset of `text` in the query.
    pub position: usize,
}

impl<'a> Token<'a> {
    /// Text of a literal with the surrounding quotes of a quoted literal removed.
    pub fn value(&self) -> &'a str {
        match self.kind {
            TokenKind::QuotedLiteral if self.text.len() >= 2 => &self.text[1..self.text.len() - 1],
            _ => self.text,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::Eof | TokenKind::Error)
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.kind, self.text)
    }
}

fn single(c: char) -> Option<TokenKind> {
    match c {
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        ':' => Some(TokenKind::Colon),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        _ => None,
    }
}

fn ends_literal(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ':' | '[' | ']')
}

/// Pull-based tokenizer over a query string.
///
/// ```rust
/// use badger::query::{Lexer, TokenKind};
///
/// let kinds: Vec<TokenKind> = Lexer::new("tag:(lemon OR lime)").map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Literal,
///         TokenKind::Colon,
///         TokenKind::LParen,
///         TokenKind::Literal,
///         TokenKind::Or,
///         TokenKind::Literal,
///         TokenKind::RParen,
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            finished: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token<'a> {
        let token = Token {
            kind,
            text: &self.input[self.pos..self.pos + len],
            position: self.pos,
        };
        self.pos += len;
        if token.is_terminal() {
            self.finished = true;
        }
        log::trace!("Lexed {} at {}", token, token.position);
        token
    }

    fn lex_quoted(&mut self, quote: char) -> Token<'a> {
        let body = &self.rest()[quote.len_utf8()..];
        match body.find(quote) {
            Some(end) => self.emit(TokenKind::QuotedLiteral, end + 2 * quote.len_utf8()),
            None => {
                let len = self.rest().len();
                self.emit(TokenKind::Error, len)
            }
        }
    }

    fn lex_literal(&mut self) -> Token<'a> {
        let rest = self.rest();
        let len = rest.find(ends_literal).unwrap_or(rest.len());
        let kind = match &rest[..len] {
            "OR" => TokenKind::Or,
            "AND" => TokenKind::And,
            "TO" => TokenKind::To,
            _ => TokenKind::Literal,
        };
        self.emit(kind, len)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_whitespace();
        let Some(c) = self.rest().chars().next() else {
            return Some(self.emit(TokenKind::Eof, 0));
        };

        if let Some(kind) = single(c) {
            return Some(self.emit(kind, c.len_utf8()));
        }

        let token = match c {
            '"' | '\'' => self.lex_quoted(c),
            _ => self.lex_literal(),
        };
        Some(token)
    }
}

/// Lexes `query` into its token stream.
pub fn lex(query: &str) -> Lexer<'_> {
    Lexer::new(query)
}
