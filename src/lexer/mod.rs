//! Lexical analysis module for the front end.
//!
//! This module contains the pull lexer that turns a source byte buffer
//! into tokens, one per call. It handles:
//!
//! - The mandatory leading newline sentinel
//! - Identifiers, reserved type keywords, integers and quoted literals
//! - Punctuation with one byte of lookahead (`::`, `<=`, `<&`)
//! - Line and column tracking for error reporting

pub mod lexer;
pub mod tokens;
