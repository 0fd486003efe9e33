//! Recursive-descent query parser.
//!
//! ```text
//! expr    := [boolmod] [field ":"] atom [ (AND | OR | <implicit AND>) expr ]
//! atom    := literal | quoted | range | "(" expr ")"
//! range   := "[" [value] "TO" [value] "]"
//! boolmod := "+" | "-"
//! ```
//!
//! Boolean operators have no precedence and associate to the right:
//! `a OR b AND c` parses as `a OR (b AND c)`.

use crate::errors::{BadgerError, BadgerResult, ErrorKind};
use crate::query::{Lexer, Query, Token, TokenKind};
use smallvec::SmallVec;

/// Parses `query` into a [`Query`].
///
/// Field qualifiers must name one of `valid_fields` (ignoring case); the AST
/// carries the name as spelled in `valid_fields`. Unqualified terms search
/// `default_field`. An empty query matches everything.
///
/// # Errors
///
/// Returns a `ParseError` for unknown fields, unexpected tokens, unbalanced
/// brackets or parentheses, a missing `TO`, an empty range, an unqualified
/// term when `default_field` is empty, or parentheses nested deeper than
/// [`MAX_NESTING`]. An unterminated quote is reported as a
/// `ParseError` caused by a `LexError`.
///
/// ```rust
/// use badger::query::{parse, Query};
///
/// let q = parse("tags:(cheese OR moon)", &["title", "tags"], "title").unwrap();
/// assert_eq!(
///     q,
///     Query::or(Query::contains("tags", "cheese"), Query::contains("tags", "moon"))
/// );
/// ```
pub fn parse<S: AsRef<str>>(query: &str, valid_fields: &[S], default_field: &str) -> BadgerResult<Query> {
    let mut parser = Parser::new(query, valid_fields);

    if parser.peek()?.kind == TokenKind::Eof {
        log::debug!("Empty query, matching all documents");
        return Ok(Query::All);
    }

    let parsed = parser.parse_expr(default_field, 0)?;

    let trailing = parser.next()?;
    if trailing.kind != TokenKind::Eof {
        return Err(parse_error(&format!("unexpected: {}", trailing)));
    }

    log::debug!("Parsed query {:?} as {}", query, parsed);
    Ok(parsed)
}

/// Deepest parenthesized nesting a query may use.
pub const MAX_NESTING: usize = 256;

fn parse_error(message: &str) -> BadgerError {
    log::error!("Failed to parse query: {}", message);
    BadgerError::new(message, ErrorKind::ParseError)
}

struct Parser<'a, S> {
    lexer: Lexer<'a>,
    input_len: usize,
    valid_fields: &'a [S],
    // most recently consumed tokens, oldest first
    consumed: SmallVec<[Token<'a>; 2]>,
    // tokens put back by backup(), next to read on top
    pending: SmallVec<[Token<'a>; 2]>,
}

impl<'a, S: AsRef<str>> Parser<'a, S> {
    fn new(input: &'a str, valid_fields: &'a [S]) -> Self {
        Parser {
            lexer: Lexer::new(input),
            input_len: input.len(),
            valid_fields,
            consumed: SmallVec::new(),
            pending: SmallVec::new(),
        }
    }

    fn next(&mut self) -> BadgerResult<Token<'a>> {
        let token = match self.pending.pop() {
            Some(token) => token,
            None => self.lexer.next().unwrap_or(Token {
                kind: TokenKind::Eof,
                text: "",
                position: self.input_len,
            }),
        };

        if token.kind == TokenKind::Error {
            let message = format!("unterminated quoted literal at {}", token.position);
            log::error!("Failed to lex query: {}", message);
            let cause = BadgerError::new(&message, ErrorKind::LexError);
            return Err(BadgerError::new_with_cause(
                &format!("invalid query: {}", message),
                ErrorKind::ParseError,
                cause,
            ));
        }

        if self.consumed.len() == 2 {
            self.consumed.remove(0);
        }
        self.consumed.push(token);
        Ok(token)
    }

    fn backup(&mut self) {
        if let Some(token) = self.consumed.pop() {
            self.pending.push(token);
        }
    }

    fn peek(&mut self) -> BadgerResult<Token<'a>> {
        let token = self.next()?;
        self.backup();
        Ok(token)
    }

    /// Parses a chain of terms up to `)` or the end of input.
    ///
    /// Terms are collected in a loop and folded from the right, so only
    /// parenthesized groups nest on the call stack.
    fn parse_expr(&mut self, default_field: &str, depth: usize) -> BadgerResult<Query> {
        let mut chain: Vec<(Query, TokenKind)> = Vec::new();

        let last = loop {
            let term = self.parse_term(default_field, depth)?;

            let token = self.next()?;
            let op = match token.kind {
                TokenKind::RParen => {
                    self.backup();
                    break term;
                }
                TokenKind::Eof => break term,
                TokenKind::Or => TokenKind::Or,
                TokenKind::And => TokenKind::And,
                _ => {
                    self.backup();
                    TokenKind::And
                }
            };
            chain.push((term, op));
        };

        Ok(chain.into_iter().rev().fold(last, |right, (left, op)| {
            if op == TokenKind::Or {
                Query::or(left, right)
            } else {
                Query::and(left, right)
            }
        }))
    }

    fn parse_term(&mut self, default_field: &str, depth: usize) -> BadgerResult<Query> {
        let negate = self.parse_bool_mod()? == TokenKind::Minus;
        let field = match self.parse_field()? {
            Some(field) => field,
            None => default_field.to_string(),
        };

        let token = self.next()?;
        let query = match token.kind {
            TokenKind::Literal | TokenKind::QuotedLiteral => {
                Query::contains(&self.resolve_field(&field)?, token.value())
            }
            TokenKind::LBracket => {
                self.backup();
                let (first, last) = self.parse_range()?;
                Query::range(&self.resolve_field(&field)?, first, last)
            }
            TokenKind::LParen => {
                if depth >= MAX_NESTING {
                    return Err(parse_error("query too deeply nested"));
                }
                let inner = self.parse_expr(&field, depth + 1)?;
                let closing = self.next()?;
                if closing.kind != TokenKind::RParen {
                    return Err(parse_error(&format!("expected ), got {}", closing)));
                }
                inner
            }
            TokenKind::Eof => return Err(parse_error("unexpected end of query")),
            _ => return Err(parse_error(&format!("unexpected: {}", token))),
        };

        if negate {
            Ok(Query::not(query))
        } else {
            Ok(query)
        }
    }

    fn parse_bool_mod(&mut self) -> BadgerResult<TokenKind> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Plus | TokenKind::Minus => Ok(token.kind),
            _ => {
                self.backup();
                Ok(TokenKind::Plus)
            }
        }
    }

    /// Reads an optional `field:` qualifier.
    fn parse_field(&mut self) -> BadgerResult<Option<String>> {
        let name = self.next()?;
        if name.kind != TokenKind::Literal {
            self.backup();
            return Ok(None);
        }

        let colon = self.next()?;
        if colon.kind != TokenKind::Colon {
            self.backup();
            self.backup();
            return Ok(None);
        }

        match self.canonical_field(name.text) {
            Some(field) => Ok(Some(field)),
            None => Err(parse_error(&format!(
                "unknown field '{}'",
                name.text.to_lowercase()
            ))),
        }
    }

    /// Checks the field a term applies to, which may be the default field.
    fn resolve_field(&self, field: &str) -> BadgerResult<String> {
        if field.is_empty() {
            return Err(parse_error("no field specified and no default field set"));
        }
        self.canonical_field(field)
            .ok_or_else(|| parse_error(&format!("unknown field '{}'", field.to_lowercase())))
    }

    fn canonical_field(&self, field: &str) -> Option<String> {
        let wanted = field.to_lowercase();
        self.valid_fields
            .iter()
            .map(|valid| valid.as_ref())
            .find(|valid| valid.to_lowercase() == wanted)
            .map(str::to_string)
    }

    fn parse_range(&mut self) -> BadgerResult<(&'a str, &'a str)> {
        let open = self.next()?;
        if open.kind != TokenKind::LBracket {
            return Err(parse_error(&format!("expected [, got {}", open)));
        }

        let token = self.next()?;
        let first = match token.kind {
            TokenKind::Literal | TokenKind::QuotedLiteral => token.value(),
            TokenKind::To => {
                self.backup();
                ""
            }
            _ => return Err(parse_error(&format!("unexpected: {}", token))),
        };

        let to = self.next()?;
        if to.kind != TokenKind::To {
            return Err(parse_error(&format!("expected TO, got {}", to)));
        }

        let token = self.next()?;
        let last = match token.kind {
            TokenKind::Literal | TokenKind::QuotedLiteral => token.value(),
            TokenKind::RBracket => {
                self.backup();
                ""
            }
            _ => return Err(parse_error(&format!("unexpected: {}", token))),
        };

        let close = self.next()?;
        if close.kind != TokenKind::RBracket {
            return Err(parse_error(&format!("expected ], got {}", close)));
        }

        if first.is_empty() && last.is_empty() {
            return Err(parse_error("empty range"));
        }
        Ok((first, last))
    }
}
