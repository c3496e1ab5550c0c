//! Parser module for building the Abstract Syntax Tree (AST).
//!
//! This module turns the token stream into an AST without an operator
//! precedence table. Each statement is assembled left to right from the
//! nodes it produces, so `1 + 2 + 3` groups as `1 + (2 + 3)`. It handles:
//!
//! - Statement wiring and statement terminators
//! - Function literals, calls, vector literals and if-expressions
//! - Scoped name resolution and implicit local declaration
//! - A bounded stack of grammar modes
//!
//! Errors carry a stack of frames, innermost first, so a failure deep in a
//! nested production reports every construct it was inside.

pub mod expr;
pub mod lookups;
pub mod modes;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
