//! Grammar modes.
//!
//! The active mode decides which closing tokens may end a statement and
//! whether `;` separates items. Modes nest on a bounded stack.

use std::fmt::Display;

use crate::{errors::errors::ParserStatus, lexer::tokens::TokenKind, PARSER_MODE_MAX_STACK_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Nothing pushed yet.
    None,
    Module,
    VecBody,
    FnCallArgs,
    Fn,
    IfCond,
    IfBody,
}

impl ParseMode {
    /// Whether `kind` closes the construct this mode belongs to.
    pub fn closes_with(&self, kind: TokenKind) -> bool {
        matches!(
            (self, kind),
            (ParseMode::FnCallArgs, TokenKind::CloseParen)
                | (ParseMode::IfCond, TokenKind::CloseParen)
                | (ParseMode::IfBody, TokenKind::CloseCurly)
                | (ParseMode::Fn, TokenKind::CloseCurly)
                | (ParseMode::VecBody, TokenKind::CloseBracket)
        )
    }

    /// Modes in which `;` ends an item even when it is empty.
    pub fn separates_items(&self) -> bool {
        matches!(self, ParseMode::FnCallArgs | ParseMode::VecBody)
    }
}

impl Display for ParseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParseMode::None => "NONE",
            ParseMode::Module => "MODULE",
            ParseMode::VecBody => "VEC_BODY",
            ParseMode::FnCallArgs => "FN_CALL_ARGS",
            ParseMode::Fn => "FN",
            ParseMode::IfCond => "IF_COND",
            ParseMode::IfBody => "IF_BODY",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModeStack {
    modes: Vec<ParseMode>,
}

impl ModeStack {
    pub fn new() -> Self {
        ModeStack {
            modes: Vec::with_capacity(PARSER_MODE_MAX_STACK_SIZE),
        }
    }

    pub fn push(&mut self, mode: ParseMode) -> Result<(), ParserStatus> {
        if self.modes.len() >= PARSER_MODE_MAX_STACK_SIZE {
            return Err(ParserStatus::ModePushFail);
        }

        self.modes.push(mode);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<ParseMode, ParserStatus> {
        self.modes.pop().ok_or(ParserStatus::ModePopFail)
    }

    pub fn current(&self) -> ParseMode {
        self.modes.last().copied().unwrap_or(ParseMode::None)
    }

    pub fn depth(&self) -> usize {
        self.modes.len()
    }
}
