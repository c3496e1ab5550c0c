use std::fmt::Display;

use thiserror::Error;

use crate::{
    ast::ast::NodeRef, lexer::tokens::Token, parser::modes::ParseMode, Position, Span,
    ERROR_MAX_STACK_SIZE,
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexStatus {
    #[error("source must start with a newline")]
    MissingLeadingNewline,
    #[error("unrecognised byte {0:#04x}")]
    UnrecognisedToken(u8),
    #[error("integer literal does not fit in 64 bits")]
    IntegerOverflow,
    #[error("quoted literal is too long")]
    LiteralTooLong,
    #[error("quoted literal is never closed")]
    UnterminatedLiteral,
    #[error("expected token not found")]
    ExpectedTokenNotFound,
}

impl LexStatus {
    pub fn name(&self) -> &'static str {
        match self {
            LexStatus::MissingLeadingNewline => "MissingLeadingNewline",
            LexStatus::UnrecognisedToken(_) => "UnrecognisedToken",
            LexStatus::IntegerOverflow => "IntegerOverflow",
            LexStatus::LiteralTooLong => "LiteralTooLong",
            LexStatus::UnterminatedLiteral => "UnterminatedLiteral",
            LexStatus::ExpectedTokenNotFound => "ExpectedTokenNotFound",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub status: LexStatus,
    pub token: Token,
}

impl LexError {
    pub fn new(status: LexStatus, token: Token) -> Self {
        LexError { status, token }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.status, self.token.position.line, self.token.position.column
        )
    }
}

impl std::error::Error for LexError {}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserStatus {
    #[error("{0}")]
    Lex(#[from] LexStatus),
    #[error("grammar nesting is too deep")]
    ModePushFail,
    #[error("grammar mode stack is empty")]
    ModePopFail,
    #[error("name is already declared in this scope")]
    VarInsertFail,
    #[error("invalid integer literal")]
    InvalidInt,
    #[error("invalid character literal")]
    InvalidChar,
    #[error("invalid vector literal")]
    InvalidVec,
    #[error("invalid function literal")]
    InvalidFn,
    #[error("invalid call")]
    InvalidCall,
    #[error("invalid if expression")]
    InvalidIf,
    #[error("else arm without a condition")]
    MissingCondition,
    #[error("too many arguments")]
    TooManyArguments,
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("invalid type")]
    InvalidType,
    #[error("unsupported token")]
    UnsupportedToken,
    #[error("unexpected terminator")]
    UnexpectedTerminator,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("invalid token sequence")]
    InvalidTokenSequence,
    #[error("invalid final value")]
    InvalidFinalValue,
}

impl ParserStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ParserStatus::Lex(status) => status.name(),
            ParserStatus::ModePushFail => "ModePushFail",
            ParserStatus::ModePopFail => "ModePopFail",
            ParserStatus::VarInsertFail => "VarInsertFail",
            ParserStatus::InvalidInt => "InvalidInt",
            ParserStatus::InvalidChar => "InvalidChar",
            ParserStatus::InvalidVec => "InvalidVec",
            ParserStatus::InvalidFn => "InvalidFn",
            ParserStatus::InvalidCall => "InvalidCall",
            ParserStatus::InvalidIf => "InvalidIf",
            ParserStatus::MissingCondition => "MissingCondition",
            ParserStatus::TooManyArguments => "TooManyArguments",
            ParserStatus::InvalidParameter => "InvalidParameter",
            ParserStatus::InvalidType => "InvalidType",
            ParserStatus::UnsupportedToken => "UnsupportedToken",
            ParserStatus::UnexpectedTerminator => "UnexpectedTerminator",
            ParserStatus::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ParserStatus::InvalidTokenSequence => "InvalidTokenSequence",
            ParserStatus::InvalidFinalValue => "InvalidFinalValue",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferStatus {
    #[error("node has no type")]
    InvalidNode,
    #[error("cannot get type from node")]
    CannotGetTypeFromNode,
    #[error("variable type not found")]
    VarTypeNotFound,
    #[error("invalid vector item")]
    InvalidVecItem,
    #[error("invalid function")]
    InvalidFn,
    #[error("function body is empty")]
    EmptyFnBody,
    #[error("last statement does not match the return type")]
    InvalidReturnType,
    #[error("cannot get call type")]
    CannotGetCallType,
    #[error("call on a value that is not a function")]
    CallNotOnFn,
    #[error("invalid number of arguments in call")]
    InvalidNumOfArgsInCall,
    #[error("invalid call argument")]
    InvalidCallArg,
    #[error("cannot get argument type")]
    CannotGetArgType,
    #[error("argument type does not match the parameter")]
    InvalidArgType,
    #[error("invalid condition")]
    InvalidCond,
    #[error("invalid if body")]
    InvalidIfBody,
    #[error("left side of assignment must be a variable")]
    InvalidAssignLeftSide,
    #[error("invalid right side of assignment")]
    InvalidAssignRightSide,
    #[error("left side of cast must be a type or a typed variable")]
    InvalidCastLeftNode,
    #[error("raw file descriptor must be 1 or 2")]
    InvalidRawIntFd,
    #[error("invalid left side")]
    InvalidLeftSide,
    #[error("invalid right side")]
    InvalidRightSide,
    #[error("node types are not equal")]
    NodeTypesNotEqual,
    #[error("invalid type for node")]
    InvalidTypeForNode,
}

impl InferStatus {
    pub fn name(&self) -> &'static str {
        match self {
            InferStatus::InvalidNode => "InvalidNode",
            InferStatus::CannotGetTypeFromNode => "CannotGetTypeFromNode",
            InferStatus::VarTypeNotFound => "VarTypeNotFound",
            InferStatus::InvalidVecItem => "InvalidVecItem",
            InferStatus::InvalidFn => "InvalidFn",
            InferStatus::EmptyFnBody => "EmptyFnBody",
            InferStatus::InvalidReturnType => "InvalidReturnType",
            InferStatus::CannotGetCallType => "CannotGetCallType",
            InferStatus::CallNotOnFn => "CallNotOnFn",
            InferStatus::InvalidNumOfArgsInCall => "InvalidNumOfArgsInCall",
            InferStatus::InvalidCallArg => "InvalidCallArg",
            InferStatus::CannotGetArgType => "CannotGetArgType",
            InferStatus::InvalidArgType => "InvalidArgType",
            InferStatus::InvalidCond => "InvalidCond",
            InferStatus::InvalidIfBody => "InvalidIfBody",
            InferStatus::InvalidAssignLeftSide => "InvalidAssignLeftSide",
            InferStatus::InvalidAssignRightSide => "InvalidAssignRightSide",
            InferStatus::InvalidCastLeftNode => "InvalidCastLeftNode",
            InferStatus::InvalidRawIntFd => "InvalidRawIntFd",
            InferStatus::InvalidLeftSide => "InvalidLeftSide",
            InferStatus::InvalidRightSide => "InvalidRightSide",
            InferStatus::NodeTypesNotEqual => "NodeTypesNotEqual",
            InferStatus::InvalidTypeForNode => "InvalidTypeForNode",
        }
    }
}

/// One level of parser context: what was being parsed and what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFrame {
    pub mode: ParseMode,
    pub status: ParserStatus,
    pub token: Token,
}

/// Parser failure with the innermost frame first.
///
/// Frames past `ERROR_MAX_STACK_SIZE` are dropped without notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    frames: Vec<ParseFrame>,
}

impl ParseError {
    pub fn new(mode: ParseMode, status: ParserStatus, token: Token) -> Self {
        ParseError {
            frames: vec![ParseFrame { mode, status, token }],
        }
    }

    pub fn push(&mut self, mode: ParseMode, status: ParserStatus, token: Token) {
        if self.frames.len() < ERROR_MAX_STACK_SIZE {
            self.frames.push(ParseFrame { mode, status, token });
        }
    }

    /// Adds a frame and hands the error back, for use in `map_err`.
    pub fn wrap(mut self, mode: ParseMode, status: ParserStatus, token: Token) -> Self {
        self.push(mode, status, token);
        self
    }

    pub fn status(&self) -> ParserStatus {
        self.frames[0].status
    }

    pub fn token(&self) -> Token {
        self.frames[0].token
    }

    pub fn frames(&self) -> &[ParseFrame] {
        &self.frames
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseMode::None, ParserStatus::Lex(error.status), error.token)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "[{}] {} at {}:{}",
                frame.mode, frame.status, frame.token.position.line, frame.token.position.column
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferFrame {
    pub status: InferStatus,
    pub node: NodeRef,
}

/// Inference failure with the innermost frame first.
///
/// Frames past `ERROR_MAX_STACK_SIZE` are dropped without notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferError {
    frames: Vec<InferFrame>,
}

impl InferError {
    pub fn new(status: InferStatus, node: NodeRef) -> Self {
        InferError {
            frames: vec![InferFrame { status, node }],
        }
    }

    pub fn push(&mut self, status: InferStatus, node: NodeRef) {
        if self.frames.len() < ERROR_MAX_STACK_SIZE {
            self.frames.push(InferFrame { status, node });
        }
    }

    pub fn wrap(mut self, status: InferStatus, node: NodeRef) -> Self {
        self.push(status, node);
        self
    }

    pub fn status(&self) -> InferStatus {
        self.frames[0].status
    }

    pub fn node(&self) -> NodeRef {
        self.frames[0].node
    }

    pub fn frames(&self) -> &[InferFrame] {
        &self.frames
    }
}

impl Display for InferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} at {}", frame.status, frame.node)?;
        }
        Ok(())
    }
}

impl std::error::Error for InferError {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Infer(#[from] InferError),
}

impl Error {
    /// Token that triggered the innermost failure.
    pub fn get_token(&self) -> Token {
        match self {
            Error::Lex(error) => error.token,
            Error::Parse(error) => error.token(),
            Error::Infer(error) => error.node().token,
        }
    }

    pub fn get_position(&self) -> Position {
        self.get_token().position
    }

    pub fn get_span(&self) -> Span {
        self.get_token().span
    }

    pub fn get_error_name(&self) -> &str {
        match self {
            Error::Lex(error) => error.status.name(),
            Error::Parse(error) => error.status().name(),
            Error::Infer(error) => error.status().name(),
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match self {
            Error::Lex(error) => lex_tip(error.status),
            Error::Parse(error) => match error.status() {
                ParserStatus::Lex(status) => lex_tip(status),
                ParserStatus::ModePushFail => ErrorTip::Suggestion(String::from(
                    "Expressions are nested too deeply, move some of them into variables",
                )),
                ParserStatus::VarInsertFail => ErrorTip::Suggestion(String::from(
                    "Each parameter name may only appear once",
                )),
                ParserStatus::InvalidChar => ErrorTip::Suggestion(String::from(
                    "`\\n` is the only supported escape sequence",
                )),
                ParserStatus::MissingCondition => ErrorTip::Suggestion(String::from(
                    "An else arm `{ ... }` must follow at least one `(cond) { ... }` arm",
                )),
                ParserStatus::TooManyArguments => ErrorTip::Suggestion(format!(
                    "Functions take at most {} arguments",
                    crate::AST_MAX_ARGS
                )),
                ParserStatus::UnsupportedToken => ErrorTip::Suggestion(String::from(
                    "This token is reserved and has no meaning yet",
                )),
                ParserStatus::InvalidTokenSequence => ErrorTip::Suggestion(String::from(
                    "Values must be separated by an operator, did you miss a newline?",
                )),
                ParserStatus::InvalidFinalValue => ErrorTip::Suggestion(String::from(
                    "A statement cannot end with two values",
                )),
                _ => ErrorTip::None,
            },
            Error::Infer(error) => match error.status() {
                InferStatus::VarTypeNotFound => ErrorTip::Suggestion(String::from(
                    "Variables get their type from their first assignment",
                )),
                InferStatus::EmptyFnBody => {
                    ErrorTip::Suggestion(String::from("Function bodies cannot be empty"))
                }
                InferStatus::InvalidRawIntFd => ErrorTip::Suggestion(String::from(
                    "Write to 1 (stdout), 2 (stderr) or an `fd` value",
                )),
                InferStatus::NodeTypesNotEqual => ErrorTip::Suggestion(String::from(
                    "Both sides must have the same type, there are no implicit conversions",
                )),
                InferStatus::InvalidAssignLeftSide => {
                    ErrorTip::Suggestion(String::from("Only variables can be assigned to"))
                }
                _ => ErrorTip::None,
            },
        }
    }
}

fn lex_tip(status: LexStatus) -> ErrorTip {
    match status {
        LexStatus::MissingLeadingNewline => {
            ErrorTip::Suggestion(String::from("Add an empty line at the top of the file"))
        }
        LexStatus::IntegerOverflow => ErrorTip::Suggestion(String::from(
            "Integer literals must fit in a signed 64 bit integer",
        )),
        LexStatus::LiteralTooLong => ErrorTip::Suggestion(format!(
            "Quoted literals must be shorter than {} bytes",
            crate::MAX_INLINE_LITERAL_LEN
        )),
        _ => ErrorTip::None,
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}
