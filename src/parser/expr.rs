use log::debug;

use crate::{
    ast::{
        ast::{CallNode, FnNode, IfArm, IfNode, Node, NodeKind, VecNode},
        scopes::SymbolId,
        types::FnId,
    },
    errors::errors::{ParseError, ParserStatus},
    lexer::tokens::{Token, TokenKind},
    symbol_table::symbol_table::SymbolRole,
    AST_MAX_ARGS,
};

use super::{
    modes::ParseMode,
    parser::Parser,
    stmt::{parse_stmt, parse_stmts, StmtEnd},
    types::{parse_return_type, parse_type_token},
};

/// Resolves an identifier through the scope chain, declaring a local in
/// `scope` when the name is not visible anywhere.
pub fn parse_symbol_expr(
    parser: &mut Parser<'_>,
    token: Token,
    scope: FnId,
) -> Result<Node, ParseError> {
    let name = parser.text(token);

    if let Some(symbol) = parser.scopes().resolve(scope, name) {
        let node = Node::new(NodeKind::Var(symbol), token);
        return parse_check_call(parser, node, scope);
    }

    let index = parser.scopes_mut()[scope]
        .symbols
        .find_or_insert(name, SymbolRole::Local);

    Ok(Node::new(NodeKind::Var(SymbolId { scope, index }), token))
}

/// Turns a resolved variable into a call when `(` follows it directly.
pub fn parse_check_call(
    parser: &mut Parser<'_>,
    callee: Node,
    scope: FnId,
) -> Result<Node, ParseError> {
    let Some(open) = parser.consume_if(TokenKind::OpenParen)? else {
        return Ok(callee);
    };

    let token = callee.token;
    let args = parse_call_args(parser, open, scope)
        .map_err(|error| parser.wrap(error, ParserStatus::InvalidCall, token))?;

    Ok(Node::new(
        NodeKind::Call(CallNode {
            callee: Box::new(callee),
            args,
        }),
        token,
    ))
}

fn parse_call_args(
    parser: &mut Parser<'_>,
    open: Token,
    scope: FnId,
) -> Result<Vec<Node>, ParseError> {
    parser.push_mode(ParseMode::FnCallArgs, open)?;

    let mut args = vec![];

    loop {
        let (node, end) = parse_stmt(parser, scope)?;

        match node {
            Some(node) => {
                if args.len() == AST_MAX_ARGS {
                    return Err(parser.error(ParserStatus::TooManyArguments, node.token));
                }
                args.push(node);
            }
            // `f()` is the only place an argument may be missing
            None if end == StmtEnd::Close && args.is_empty() => {}
            None => {
                return Err(parser.error(ParserStatus::InvalidCall, parser.last_token()));
            }
        }

        if end == StmtEnd::Close {
            break;
        }
    }

    parser.pop_mode(parser.last_token())?;
    Ok(args)
}

pub fn parse_int_expr(
    parser: &mut Parser<'_>,
    token: Token,
    _scope: FnId,
) -> Result<Node, ParseError> {
    let value = std::str::from_utf8(parser.text(token))
        .ok()
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| parser.error(ParserStatus::InvalidInt, token))?;

    Ok(Node::new(NodeKind::Int(value), token))
}

pub fn parse_char_expr(
    parser: &mut Parser<'_>,
    token: Token,
    _scope: FnId,
) -> Result<Node, ParseError> {
    let text = parser.text(token);
    let content = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();

    let value = match content {
        [b'\\', b'n'] => b'\n',
        [b'\\', _] => return Err(parser.error(ParserStatus::InvalidChar, token)),
        [byte] => *byte,
        _ => return Err(parser.error(ParserStatus::InvalidChar, token)),
    };

    Ok(Node::new(NodeKind::Char(value), token))
}

pub fn parse_type_expr(
    parser: &mut Parser<'_>,
    token: Token,
    _scope: FnId,
) -> Result<Node, ParseError> {
    let var_type = parse_type_token(parser, token)?;
    Ok(Node::new(NodeKind::Type(var_type), token))
}

/// `{( name :: type ; ... )[ type ] body }`
pub fn parse_fn_expr(
    parser: &mut Parser<'_>,
    token: Token,
    scope: FnId,
) -> Result<Node, ParseError> {
    parser.expect_error(TokenKind::OpenParen, ParserStatus::InvalidFn)?;

    let id = parser.scopes_mut().alloc(scope);

    parser.push_mode(ParseMode::Fn, token)?;
    let body = parse_fn_parts(parser, id)
        .map_err(|error| parser.wrap(error, ParserStatus::InvalidFn, token))?;
    parser.pop_mode(parser.last_token())?;

    debug!(
        "parsed {} with {} parameters and {} statements",
        id,
        parser.scopes()[id].signature.args.len(),
        body.len()
    );

    Ok(Node::new(NodeKind::Fn(FnNode { id, body }), token))
}

fn parse_fn_parts(parser: &mut Parser<'_>, id: FnId) -> Result<Vec<Node>, ParseError> {
    parse_params(parser, id)?;

    let return_type = parse_return_type(parser)?;
    parser.scopes_mut()[id].signature.return_type = return_type;

    parse_stmts(parser, id)
}

/// Parameters up to and including the closing `)`.
fn parse_params(parser: &mut Parser<'_>, id: FnId) -> Result<(), ParseError> {
    let mut token = parser.next_significant()?;

    if token.kind == TokenKind::CloseParen {
        return Ok(());
    }

    loop {
        if token.kind != TokenKind::Identifier {
            return Err(parser.error(ParserStatus::InvalidParameter, token));
        }

        let define = parser.next_significant()?;
        if define.kind != TokenKind::Define {
            return Err(parser.error(ParserStatus::InvalidParameter, define));
        }

        let type_token = parser.next_significant()?;
        let var_type = parse_type_token(parser, type_token)
            .map_err(|error| parser.wrap(error, ParserStatus::InvalidParameter, token))?;

        if parser.scopes()[id].signature.args.len() == AST_MAX_ARGS {
            return Err(parser.error(ParserStatus::TooManyArguments, token));
        }

        let name = parser.text(token);
        let fn_scope = &mut parser.scopes_mut()[id];
        let Some(index) = fn_scope.symbols.insert(name, SymbolRole::Argument) else {
            return Err(parser.error(ParserStatus::VarInsertFail, token));
        };

        if let Some(symbol) = fn_scope.symbols.get_mut(index) {
            symbol.fill_type(var_type);
        }
        fn_scope.signature.args.push(SymbolId { scope: id, index });

        let separator = parser.next_significant()?;
        match separator.kind {
            TokenKind::Semicolon => token = parser.next_significant()?,
            TokenKind::CloseParen => return Ok(()),
            _ => return Err(parser.error(ParserStatus::InvalidParameter, separator)),
        }
    }
}

/// `@[ item ; item ... ]`
pub fn parse_vec_expr(
    parser: &mut Parser<'_>,
    token: Token,
    scope: FnId,
) -> Result<Node, ParseError> {
    parser.expect_error(TokenKind::OpenBracket, ParserStatus::InvalidVec)?;

    parser.push_mode(ParseMode::VecBody, token)?;
    let items = parse_stmts(parser, scope)
        .map_err(|error| parser.wrap(error, ParserStatus::InvalidVec, token))?;
    parser.pop_mode(parser.last_token())?;

    Ok(Node::new(
        NodeKind::Vec(VecNode {
            items,
            item_types: None,
        }),
        token,
    ))
}

/// `?{ (cond) { body } (cond) { body } ... { else } }`
pub fn parse_if_expr(
    parser: &mut Parser<'_>,
    token: Token,
    scope: FnId,
) -> Result<Node, ParseError> {
    parser.expect_error(TokenKind::OpenCurly, ParserStatus::InvalidIf)?;

    let (arms, else_body) = parse_if_arms(parser, scope)
        .map_err(|error| parser.wrap(error, ParserStatus::InvalidIf, token))?;

    Ok(Node::new(
        NodeKind::If(IfNode {
            arms,
            else_body,
            return_type: None,
        }),
        token,
    ))
}

type IfParts = (Vec<IfArm>, Option<Vec<Node>>);

fn parse_if_arms(parser: &mut Parser<'_>, scope: FnId) -> Result<IfParts, ParseError> {
    let mut arms = vec![];

    loop {
        let token = parser.next_significant()?;

        match token.kind {
            TokenKind::OpenParen => {
                let cond = parse_if_cond(parser, token, scope)?;

                let open = parser.next_significant()?;
                if open.kind != TokenKind::OpenCurly {
                    return Err(parser.error(ParserStatus::InvalidIf, open));
                }

                let body = parse_if_body(parser, open, scope)?;
                arms.push(IfArm {
                    cond: Box::new(cond),
                    body,
                });
            }
            TokenKind::OpenCurly => {
                if arms.is_empty() {
                    return Err(parser.error(ParserStatus::MissingCondition, token));
                }

                let else_body = parse_if_body(parser, token, scope)?;

                let close = parser.next_significant()?;
                if close.kind != TokenKind::CloseCurly {
                    return Err(parser.error(ParserStatus::InvalidIf, close));
                }

                return Ok((arms, Some(else_body)));
            }
            TokenKind::CloseCurly if !arms.is_empty() => return Ok((arms, None)),
            TokenKind::CloseCurly => {
                return Err(parser.error(ParserStatus::MissingCondition, token));
            }
            _ => return Err(parser.error(ParserStatus::InvalidIf, token)),
        }
    }
}

fn parse_if_cond(parser: &mut Parser<'_>, open: Token, scope: FnId) -> Result<Node, ParseError> {
    parser.push_mode(ParseMode::IfCond, open)?;
    let (cond, end) = parse_stmt(parser, scope)?;

    let cond = match (cond, end) {
        (Some(cond), StmtEnd::Close) => cond,
        _ => return Err(parser.error(ParserStatus::InvalidIf, parser.last_token())),
    };

    parser.pop_mode(parser.last_token())?;
    Ok(cond)
}

fn parse_if_body(parser: &mut Parser<'_>, open: Token, scope: FnId) -> Result<Vec<Node>, ParseError> {
    parser.push_mode(ParseMode::IfBody, open)?;
    let body = parse_stmts(parser, scope)?;
    parser.pop_mode(parser.last_token())?;
    Ok(body)
}
