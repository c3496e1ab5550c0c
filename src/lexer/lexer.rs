use lazy_static::lazy_static;
use log::trace;
use regex::bytes::Regex;

use crate::{
    errors::errors::{LexError, LexStatus},
    Position, Span, MAX_INLINE_LITERAL_LEN, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Receives the lexer positioned at the match and the match length.
/// `Ok(None)` means the bytes were consumed without producing a token.
pub type PatternHandler = fn(&mut Lexer<'_>, usize) -> Result<Option<Token>, LexStatus>;

pub struct Pattern {
    regex: Regex,
    handler: PatternHandler,
}

lazy_static! {
    static ref PATTERNS: Vec<Pattern> = vec![
        Pattern { regex: Regex::new(r"^[ \t\r]+").unwrap(), handler: skip_handler },
        Pattern { regex: Regex::new(r"^\n").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Newline, "\n") },
        Pattern { regex: Regex::new(r"(?-u)^#[^\n]*").unwrap(), handler: comment_handler },
        Pattern { regex: Regex::new(r"^[A-Za-z][A-Za-z0-9]*").unwrap(), handler: symbol_handler },
        Pattern { regex: Regex::new(r"^[0-9]+").unwrap(), handler: number_handler },
        Pattern { regex: Regex::new(r#"^["']"#).unwrap(), handler: quote_handler },
        Pattern { regex: Regex::new(r"^::").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Define, "::") },
        Pattern { regex: Regex::new(r"^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assign, ":") },
        Pattern { regex: Regex::new(r"^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        Pattern { regex: Regex::new(r"^<&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Write, "<&") },
        Pattern { regex: Regex::new(r"^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        Pattern { regex: Regex::new(r"^\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        Pattern { regex: Regex::new(r"^\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        Pattern { regex: Regex::new(r"^\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        Pattern { regex: Regex::new(r"^\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        Pattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        Pattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        Pattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        Pattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        Pattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        Pattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        Pattern { regex: Regex::new(r"^@").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::At, "@") },
        Pattern { regex: Regex::new(r"^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        Pattern { regex: Regex::new(r"^\?").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Question, "?") },
        Pattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "=") },
        Pattern { regex: Regex::new(r"^&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&") },
    ];
}

/// Pull lexer over a borrowed source buffer.
///
/// The buffer must begin with `\n`. That byte is consumed on the first pull
/// and never emitted, so the first real line is reported as line 2.
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
    started: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a [u8]) -> Lexer<'a> {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
            started: false,
        }
    }

    pub fn remainder(&self) -> &'a [u8] {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn cursor_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());

        for byte in &self.source[self.pos..end] {
            if *byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }

        self.pos = end;
    }

    /// Builds a token over the next `len` bytes and moves past them.
    pub fn emit(&mut self, kind: TokenKind, len: usize) -> Token {
        let token = MK_TOKEN!(kind, Span::new(self.pos, self.pos + len), self.cursor_position());
        self.advance_n(len);
        token
    }

    /// An `Unknown` token covering `len` bytes at the cursor, without consuming them.
    fn error_token(&self, len: usize) -> Token {
        let end = (self.pos + len.max(1)).min(self.source.len());
        MK_TOKEN!(TokenKind::Unknown, Span::new(self.pos, end), self.cursor_position())
    }

    /// Returns the next token, or `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if !self.started {
            self.started = true;

            if self.source.first() != Some(&b'\n') {
                return Err(LexError::new(LexStatus::MissingLeadingNewline, self.error_token(1)));
            }

            self.advance_n(1);
        }

        'outer: while !self.at_eof() {
            let remainder = self.remainder();

            for pattern in PATTERNS.iter() {
                let Some(found) = pattern.regex.find(remainder) else {
                    continue;
                };

                let len = found.end();
                let token = (pattern.handler)(self, len)
                    .map_err(|status| LexError::new(status, self.error_token(len)))?;

                match token {
                    Some(token) => {
                        trace!("lexed {}", token);
                        return Ok(Some(token));
                    }
                    None => continue 'outer,
                }
            }

            return Err(LexError::new(
                LexStatus::UnrecognisedToken(remainder[0]),
                self.error_token(1),
            ));
        }

        Ok(None)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn skip_handler(lexer: &mut Lexer<'_>, len: usize) -> Result<Option<Token>, LexStatus> {
    lexer.advance_n(len);
    Ok(None)
}

fn comment_handler(lexer: &mut Lexer<'_>, len: usize) -> Result<Option<Token>, LexStatus> {
    Ok(Some(lexer.emit(TokenKind::Comment, len)))
}

fn symbol_handler(lexer: &mut Lexer<'_>, len: usize) -> Result<Option<Token>, LexStatus> {
    let value = &lexer.remainder()[..len];
    let reserved = std::str::from_utf8(value)
        .ok()
        .is_some_and(|name| RESERVED_LOOKUP.contains_key(name));

    if reserved {
        Ok(Some(lexer.emit(TokenKind::Type, len)))
    } else {
        Ok(Some(lexer.emit(TokenKind::Identifier, len)))
    }
}

fn number_handler(lexer: &mut Lexer<'_>, len: usize) -> Result<Option<Token>, LexStatus> {
    let digits = &lexer.remainder()[..len];

    std::str::from_utf8(digits)
        .ok()
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or(LexStatus::IntegerOverflow)?;

    Ok(Some(lexer.emit(TokenKind::Int, len)))
}

fn quote_handler(lexer: &mut Lexer<'_>, _len: usize) -> Result<Option<Token>, LexStatus> {
    let remainder = lexer.remainder();
    let quote = remainder[0];
    let mut content_len = None;

    for (i, byte) in remainder[1..].iter().enumerate() {
        if *byte == quote {
            content_len = Some(i);
            break;
        }

        if i + 1 >= MAX_INLINE_LITERAL_LEN {
            return Err(LexStatus::LiteralTooLong);
        }
    }

    let content_len = content_len.ok_or(LexStatus::UnterminatedLiteral)?;
    let content = &remainder[1..1 + content_len];

    let kind = match content {
        [_] | [b'\\', _] => TokenKind::Char,
        _ => TokenKind::String,
    };

    Ok(Some(lexer.emit(kind, content_len + 2)))
}

/// Lexes the whole buffer into a vector of tokens.
pub fn tokenize(source: &[u8]) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}
