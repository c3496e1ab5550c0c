use log::trace;

use crate::{
    ast::{
        ast::Node,
        types::FnId,
    },
    errors::errors::{ParseError, ParserStatus},
    lexer::tokens::TokenKind,
};

use super::{modes::ParseMode, parser::Parser};

/// How a statement ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtEnd {
    /// A separator ended it. More statements may follow.
    Next,
    /// A closing token valid for the mode ended it, or end of input in the module.
    Close,
}

/// Assembles one statement from the nodes produced in order.
///
/// Until the first operator arrives the statement is a single value in
/// `head`. After that the operators wait in `spine`, outermost first: each
/// one becomes the right side of the one before it when the statement is
/// finished. The last entry is the open operator. `value_tmp` holds at most
/// one value waiting for the operator that will own it.
#[derive(Debug, Default)]
struct Wiring {
    head: Option<Node>,
    spine: Vec<Node>,
    value_tmp: Option<Node>,
}

impl Wiring {
    fn is_empty(&self) -> bool {
        self.head.is_none() && self.spine.is_empty() && self.value_tmp.is_none()
    }

    fn merge(&mut self, mut node: Node) -> Result<(), ParserStatus> {
        if node.is_value() {
            if self.head.is_none() && self.spine.is_empty() {
                trace!("{} starts the statement", node.ast_kind());
                self.head = Some(node);
                return Ok(());
            }

            if self.value_tmp.is_none() {
                trace!("{} is staged", node.ast_kind());
                self.value_tmp = Some(node);
                return Ok(());
            }

            return Err(ParserStatus::InvalidTokenSequence);
        }

        let left = if self.spine.is_empty() {
            trace!("{} takes the statement as its left side", node.ast_kind());
            self.head.take()
        } else {
            trace!("{} takes the staged value as its left side", node.ast_kind());
            self.value_tmp.take()
        };

        if let Some(op) = node.as_op_mut() {
            op.left = left.map(Box::new);
        }
        self.spine.push(node);

        Ok(())
    }

    fn finish(mut self) -> Result<Option<Node>, ParserStatus> {
        if let Some(value) = self.value_tmp.take() {
            let open = self
                .spine
                .last_mut()
                .and_then(Node::as_op_mut)
                .ok_or(ParserStatus::InvalidFinalValue)?;

            trace!("staged {} closes the statement", value.ast_kind());
            open.right = Some(Box::new(value));
        }

        let Some(mut inner) = self.spine.pop() else {
            return Ok(self.head);
        };

        while let Some(mut outer) = self.spine.pop() {
            if let Some(op) = outer.as_op_mut() {
                op.right = Some(Box::new(inner));
            }
            inner = outer;
        }

        Ok(Some(inner))
    }
}

/// Parses one statement in `scope`, stopping at a terminator the current mode accepts.
pub fn parse_stmt(
    parser: &mut Parser<'_>,
    scope: FnId,
) -> Result<(Option<Node>, StmtEnd), ParseError> {
    let mut wiring = Wiring::default();

    loop {
        let Some(token) = parser.next_token()? else {
            if parser.mode() != ParseMode::Module {
                return Err(parser.error(ParserStatus::UnexpectedEndOfInput, parser.last_token()));
            }

            let node = wiring
                .finish()
                .map_err(|status| parser.error(status, parser.last_token()))?;
            return Ok((node, StmtEnd::Close));
        };

        let end = match token.kind {
            TokenKind::Comment => None,
            TokenKind::Newline if wiring.is_empty() => None,
            TokenKind::Newline => Some(StmtEnd::Next),
            TokenKind::Semicolon if parser.mode().separates_items() || !wiring.is_empty() => {
                Some(StmtEnd::Next)
            }
            TokenKind::Semicolon => None,
            TokenKind::CloseParen | TokenKind::CloseCurly | TokenKind::CloseBracket => {
                if !parser.mode().closes_with(token.kind) {
                    return Err(parser.error(ParserStatus::UnexpectedTerminator, token));
                }
                Some(StmtEnd::Close)
            }
            kind => {
                let node = if let Some(op) = parser.op_kind(kind) {
                    Node::op(op, token)
                } else if let Some(handler) = parser.value_handler(kind) {
                    handler(parser, token, scope)?
                } else {
                    return Err(parser.error(ParserStatus::UnsupportedToken, token));
                };

                wiring
                    .merge(node)
                    .map_err(|status| parser.error(status, token))?;
                None
            }
        };

        if let Some(end) = end {
            let node = wiring
                .finish()
                .map_err(|status| parser.error(status, token))?;
            return Ok((node, end));
        }
    }
}

/// Parses statements until the construct the current mode belongs to is closed.
pub fn parse_stmts(parser: &mut Parser<'_>, scope: FnId) -> Result<Vec<Node>, ParseError> {
    let mut body = vec![];

    loop {
        let (node, end) = parse_stmt(parser, scope)?;

        if let Some(node) = node {
            body.push(node);
        }

        if end == StmtEnd::Close {
            return Ok(body);
        }
    }
}
