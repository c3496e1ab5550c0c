use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Node, OpKind},
        types::FnId,
    },
    errors::errors::ParseError,
    lexer::tokens::{Token, TokenKind},
};

use super::{expr::*, parser::Parser};

/// Builds a value node from the token that starts it, in the given scope.
pub type ValueHandler = fn(&mut Parser<'_>, Token, FnId) -> Result<Node, ParseError>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Operators. There is no precedence, so only the kind is recorded.
    parser.op(TokenKind::Assign, OpKind::Assign);
    parser.op(TokenKind::Define, OpKind::Cast);
    parser.op(TokenKind::Plus, OpKind::Add);
    parser.op(TokenKind::Dash, OpKind::Sub);
    parser.op(TokenKind::Write, OpKind::Write);
    parser.op(TokenKind::Equals, OpKind::Equal);
    parser.op(TokenKind::LessEquals, OpKind::LessEqual);

    // Literals and symbols
    parser.value(TokenKind::Identifier, parse_symbol_expr);
    parser.value(TokenKind::Int, parse_int_expr);
    parser.value(TokenKind::Char, parse_char_expr);
    parser.value(TokenKind::Type, parse_type_expr);

    // Nested productions
    parser.value(TokenKind::OpenCurly, parse_fn_expr);
    parser.value(TokenKind::At, parse_vec_expr);
    parser.value(TokenKind::Question, parse_if_expr);
}

// Lookup tables inside parser struct, so it's easier
pub type ValueLookup = HashMap<TokenKind, ValueHandler>;
pub type OpLookup = HashMap<TokenKind, OpKind>;
