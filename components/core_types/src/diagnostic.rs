//! Diagnostic records produced by the analysis stages.
//!
//! Diagnostics are plain value types accumulated in vectors; no stage ever
//! aborts on one. The pipeline distinguishes two severities: `error` for
//! incorrect programs and `warning` for suspicious or stylistic findings.

use crate::SourcePosition;
use serde::Serialize;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The program is incorrect
    Error,
    /// The program is suspicious or stylistically questionable
    Warning,
}

/// A positioned error or warning record.
///
/// # Examples
///
/// ```
/// use core_types::{Diagnostic, SourcePosition};
///
/// let pos = SourcePosition { line: 1, column: 7, offset: 6 };
/// let warn = Diagnostic::warning("Condition is always truthy", pos)
///     .with_node("IfStatement");
///
/// assert_eq!(warn.node.as_deref(), Some("IfStatement"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Diagnostic severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Line where the diagnostic originates (1-based)
    pub line: u32,
    /// Column where the diagnostic originates (1-based)
    pub column: u32,
    /// Kind of the originating AST node, when known
    pub node: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic at the given position.
    pub fn error(message: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line: position.line,
            column: position.column,
            node: None,
        }
    }

    /// Create a warning diagnostic at the given position.
    pub fn warning(message: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line: position.line,
            column: position.column,
            node: None,
        }
    }

    /// Create a fatal error with no meaningful position.
    ///
    /// Used by the top-level safety catch when the analyzer itself fails;
    /// the record points at the start of the source.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::error(message, SourcePosition::start())
    }

    /// Attach the kind of the originating AST node.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}
