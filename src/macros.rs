//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a pattern handler for fixed punctuation

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$span` - The byte span in the source buffer
/// * `$position` - The line and column of the first byte
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Int, Span::new(1, 3), Position::new(2, 1));
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $span:expr, $position:expr) => {
        Token {
            kind: $kind,
            span: $span,
            position: $position,
        }
    };
}

/// Creates a pattern handler that emits a token of a fixed spelling.
///
/// The handler consumes `$value.len()` bytes at the cursor, so the pattern
/// it is paired with must match exactly `$value`.
///
/// # Example
///
/// ```ignore
/// Pattern::new(r"^::", MK_DEFAULT_HANDLER!(TokenKind::Define, "::"))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer, _len| Ok(Some(lexer.emit($kind, $value.len())))
    };
}
