//! Error types and error handling for the front end.
//!
//! This module defines the error types used by every stage. It includes:
//!
//! - Status enums for the lexer, parser and inference pass
//! - Stacked parser and inference errors that collect context frames
//! - A crate level error with position, name and tip helpers

pub mod errors;
