//! Parser error helpers

use core_types::{Diagnostic, SourcePosition};

/// Create a syntax error at a given position.
pub fn syntax_error(message: impl Into<String>, position: SourcePosition) -> Diagnostic {
    Diagnostic::error(message, position)
}

/// Create an unexpected token error.
pub fn unexpected_token(lexeme: &str, position: SourcePosition) -> Diagnostic {
    syntax_error(format!("Unexpected token: '{}'", lexeme), position)
}

/// Create an unexpected end of input error.
pub fn unexpected_eof(position: SourcePosition) -> Diagnostic {
    syntax_error("Unexpected end of input", position)
}

/// Create a missing expected token error.
pub fn missing_token(expected: &str, got: &str, position: SourcePosition) -> Diagnostic {
    if got.is_empty() {
        syntax_error(
            format!("Expected '{}', got end of input", expected),
            position,
        )
    } else {
        syntax_error(format!("Expected '{}', got '{}'", expected, got), position)
    }
}
