//! Type annotation parsing.
//!
//! Types are written as reserved keywords (`u8`, `i64`, `char`, `fd`, ...).
//! They appear after `::` in parameter lists, inside the `[...]` return
//! type of a function literal, and as standalone values on the left of a
//! cast.

use crate::{
    ast::types::VarType,
    errors::errors::{ParseError, ParserStatus},
    lexer::tokens::{Token, TokenKind, RESERVED_LOOKUP},
};

use super::parser::Parser;

/// Maps a `Type` token to its type.
pub fn parse_type_token(parser: &Parser<'_>, token: Token) -> Result<VarType, ParseError> {
    if token.kind != TokenKind::Type {
        return Err(parser.error(ParserStatus::InvalidType, token));
    }

    std::str::from_utf8(parser.text(token))
        .ok()
        .and_then(|name| RESERVED_LOOKUP.get(name))
        .cloned()
        .ok_or_else(|| parser.error(ParserStatus::InvalidType, token))
}

/// Parses `[type]`, or `[]` for a function that returns nothing.
pub fn parse_return_type(parser: &mut Parser<'_>) -> Result<VarType, ParseError> {
    parser.expect_error(TokenKind::OpenBracket, ParserStatus::InvalidType)?;

    let token = parser.next_required()?;
    if token.kind == TokenKind::CloseBracket {
        return Ok(VarType::Void);
    }

    let return_type = parse_type_token(parser, token)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(return_type)
}
