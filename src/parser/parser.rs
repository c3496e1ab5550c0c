//! Parser state and the module entry point.
//!
//! The parser pulls tokens from the lexer one at a time with a single token
//! of lookahead. Productions receive the scope they are parsing in and
//! build nodes directly; symbols are declared and resolved as they are met.
//!
//! It keeps lookup tables for:
//! - Value handlers, keyed by the token that starts a value
//! - Operator kinds, keyed by the operator token

use std::collections::HashMap;

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, FnNode, OpKind},
        scopes::Scopes,
        types::FnId,
    },
    errors::errors::{LexStatus, ParseError, ParserStatus},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
};

use super::{
    lookups::{create_token_lookups, OpLookup, ValueHandler, ValueLookup},
    modes::{ModeStack, ParseMode},
    stmt::parse_stmts,
};

/// The parse state threaded through every production.
pub struct Parser<'a> {
    source: &'a [u8],
    lexer: Lexer<'a>,
    /// One token of lookahead, filled by `peek`
    peeked: Option<Token>,
    /// The most recently consumed token, used for end of input errors
    last: Token,
    modes: ModeStack,
    scopes: Scopes,
    value_lookup: ValueLookup,
    op_lookup: OpLookup,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        let mut parser = Parser {
            source,
            lexer: Lexer::new(source),
            peeked: None,
            last: Token::null(),
            modes: ModeStack::new(),
            scopes: Scopes::new(),
            value_lookup: HashMap::new(),
            op_lookup: HashMap::new(),
        };

        create_token_lookups(&mut parser);
        parser
    }

    fn pull(&mut self) -> Result<Option<Token>, ParseError> {
        let mode = self.mode();
        self.lexer
            .next_token()
            .map_err(|error| ParseError::new(mode, ParserStatus::Lex(error.status), error.token))
    }

    /// Consumes the next token. `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        let token = match self.peeked.take() {
            Some(token) => Some(token),
            None => self.pull()?,
        };

        if let Some(token) = token {
            self.last = token;
        }

        Ok(token)
    }

    pub fn peek(&mut self) -> Result<Option<Token>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.pull()?;
        }

        Ok(self.peeked)
    }

    /// Consumes the next token only if it has the given kind.
    pub fn consume_if(&mut self, kind: TokenKind) -> Result<Option<Token>, ParseError> {
        match self.peek()? {
            Some(token) if token.kind == kind => self.next_token(),
            _ => Ok(None),
        }
    }

    /// Consumes the next token, failing at end of input.
    pub fn next_required(&mut self) -> Result<Token, ParseError> {
        match self.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.error(ParserStatus::UnexpectedEndOfInput, self.last)),
        }
    }

    /// Like `next_required`, but skips newlines and comments.
    pub fn next_significant(&mut self) -> Result<Token, ParseError> {
        loop {
            let token = self.next_required()?;

            if !matches!(token.kind, TokenKind::Newline | TokenKind::Comment) {
                return Ok(token);
            }
        }
    }

    /// Expects the next token to be of the given kind, failing with `status`.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        status: ParserStatus,
    ) -> Result<Token, ParseError> {
        let token = self.next_required()?;

        if token.kind != expected_kind {
            return Err(self.error(status, token));
        }

        Ok(token)
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, ParseError> {
        self.expect_error(
            expected_kind,
            ParserStatus::Lex(LexStatus::ExpectedTokenNotFound),
        )
    }

    /// Starts an error in the current mode.
    pub fn error(&self, status: ParserStatus, token: Token) -> ParseError {
        ParseError::new(self.mode(), status, token)
    }

    /// Adds the current mode's frame to an error coming out of a nested production.
    pub fn wrap(&self, error: ParseError, status: ParserStatus, token: Token) -> ParseError {
        error.wrap(self.mode(), status, token)
    }

    pub fn push_mode(&mut self, mode: ParseMode, token: Token) -> Result<(), ParseError> {
        self.modes
            .push(mode)
            .map_err(|status| self.error(status, token))?;

        trace!("entered {} at depth {}", mode, self.modes.depth());
        Ok(())
    }

    pub fn pop_mode(&mut self, token: Token) -> Result<ParseMode, ParseError> {
        self.modes.pop().map_err(|status| self.error(status, token))
    }

    pub fn mode(&self) -> ParseMode {
        self.modes.current()
    }

    pub fn last_token(&self) -> Token {
        self.last
    }

    pub fn text(&self, token: Token) -> &'a [u8] {
        token.text(self.source)
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut Scopes {
        &mut self.scopes
    }

    pub fn into_scopes(self) -> Scopes {
        self.scopes
    }

    pub fn value_handler(&self, kind: TokenKind) -> Option<ValueHandler> {
        self.value_lookup.get(&kind).copied()
    }

    pub fn op_kind(&self, kind: TokenKind) -> Option<OpKind> {
        self.op_lookup.get(&kind).copied()
    }

    /// Registers the handler for a token that starts a value.
    pub fn value(&mut self, kind: TokenKind, handler: ValueHandler) {
        self.value_lookup.insert(kind, handler);
    }

    /// Registers the operator a token stands for.
    pub fn op(&mut self, kind: TokenKind, op: OpKind) {
        self.op_lookup.insert(kind, op);
    }
}

/// Parses a whole source buffer into an AST rooted at the module function.
pub fn parse(source: &[u8]) -> Result<Ast, ParseError> {
    let mut parser = Parser::new(source);

    parser.push_mode(ParseMode::Module, Token::null())?;
    let body = parse_stmts(&mut parser, FnId::MODULE)?;
    parser.pop_mode(parser.last_token())?;

    debug!(
        "parsed module with {} statements and {} scopes",
        body.len(),
        parser.scopes().len()
    );

    Ok(Ast {
        scopes: parser.into_scopes(),
        root: FnNode {
            id: FnId::MODULE,
            body,
        },
    })
}
