#![allow(clippy::module_inception)]

use crate::{ast::ast::Ast, errors::errors::Error, parser::parser::parse, type_checker::type_checker::infer};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symbol_table;
pub mod type_checker;

extern crate regex;

/// Buckets allocated for every new function scope. The table never grows.
pub const DEFAULT_SYMBOL_TABLE_SIZE: usize = 20;
/// Maximum depth of nested grammar modes, the module mode included.
pub const PARSER_MODE_MAX_STACK_SIZE: usize = 20;
/// Frames kept by a parser or inference error; later frames are dropped.
pub const ERROR_MAX_STACK_SIZE: usize = 20;
/// Maximum number of parameters of a function and arguments of a call.
pub const AST_MAX_ARGS: usize = 4;
/// Quoted literal contents must stay below this many bytes.
pub const MAX_INLINE_LITERAL_LEN: usize = 1024;

/// Byte range `start..end` into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.start.min(source.len())..self.end.min(source.len())]
    }
}

/// One-based line and column of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    pub fn null() -> Self {
        Position { line: 1, column: 1 }
    }
}

/// Parses and type checks a whole source buffer.
///
/// The buffer must start with a newline byte.
pub fn compile_source(source: &[u8]) -> Result<Ast, Error> {
    let mut ast = parse(source)?;
    infer(&mut ast)?;
    Ok(ast)
}

/// Finds the line containing byte `position` of the raw source.
///
/// Returns the one-based line number, the line text (invalid UTF-8 replaced)
/// and the character column of `position` inside that text.
pub fn get_line_at_position(content: &[u8], position: usize) -> Option<(usize, String, usize)> {
    if position >= content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive(|byte| *byte == b'\n') {
        let end = start + line.len();

        if (start..end).contains(&position) {
            let column = String::from_utf8_lossy(&line[..position - start]).chars().count();
            return Some((line_number, String::from_utf8_lossy(line).into_owned(), column));
        }

        start = end;
        line_number += 1;
    }

    None
}
