use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{ast::types::VarType, Position, Span};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, VarType> = {
        let mut map = HashMap::new();
        map.insert("u8", VarType::U8);
        map.insert("u16", VarType::U16);
        map.insert("u32", VarType::U32);
        map.insert("u64", VarType::U64);
        map.insert("i8", VarType::I8);
        map.insert("i16", VarType::I16);
        map.insert("i32", VarType::I32);
        map.insert("i64", VarType::I64);
        map.insert("f32", VarType::F32);
        map.insert("f64", VarType::F64);
        map.insert("char", VarType::Char);
        map.insert("fd", VarType::Fd);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Unknown,
    Identifier,
    Int,
    Char,
    String,
    Type,
    Comment,
    Newline,

    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,

    Assign, // :
    Define, // ::
    Plus,
    Dash,
    Star,
    Slash,
    Write, // <&
    At,
    Semicolon,
    Question,
    Equals,
    Less,
    LessEquals,
    And,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A lexed token. The text is not copied; slice the source with `span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub position: Position,
}

impl Token {
    /// Placeholder used where no source token exists, such as the module root.
    pub fn null() -> Self {
        Token {
            kind: TokenKind::Unknown,
            span: Span::default(),
            position: Position::null(),
        }
    }

    pub fn text<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        self.span.slice(source)
    }

    pub fn text_lossy(&self, source: &[u8]) -> String {
        String::from_utf8_lossy(self.text(source)).into_owned()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{} [{}..{})",
            self.kind, self.position.line, self.position.column, self.span.start, self.span.end
        )
    }
}
