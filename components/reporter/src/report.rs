//! Analysis result structures returned to the IDE bridge

use core_types::Diagnostic;
use parser::Program;
use serde::Serialize;

/// A diagnostic as exposed to the IDE: message plus coordinates and the
/// originating node kind when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    /// Human-readable message
    pub message: String,
    /// Line (1-based)
    pub line: u32,
    /// Column (1-based)
    pub column: u32,
    /// Kind of the originating AST node, when known
    pub node: Option<String>,
}

impl From<&Diagnostic> for DiagnosticRecord {
    fn from(diag: &Diagnostic) -> Self {
        Self {
            message: diag.message.clone(),
            line: diag.line,
            column: diag.column,
            node: diag.node.clone(),
        }
    }
}

/// Result of the lexical/syntactic entry point.
#[derive(Debug, Serialize)]
pub struct LexicalAnalysis {
    /// Rendered `=== ANÁLISIS LÉXICO ===` section
    pub lexical_report: String,
    /// Rendered `=== ANÁLISIS SINTÁCTICO ===` section
    pub syntactic_report: String,
    /// Number of lexical errors
    pub lexical_error_count: usize,
    /// Number of syntax errors
    pub syntax_error_count: usize,
    /// Number of tokens, excluding EOF
    pub token_count: usize,
    /// The parsed program, or `None` if the pipeline failed internally
    pub ast: Option<Program>,
}

impl LexicalAnalysis {
    /// Export as pretty-printed JSON for the IDE bridge.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Result of the semantic entry point.
#[derive(Debug, Serialize)]
pub struct SemanticAnalysis {
    /// Rendered `=== ANÁLISIS SEMÁNTICO ===` section
    pub report: String,
    /// Number of semantic errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Errors in source order
    pub errors: Vec<DiagnosticRecord>,
    /// Warnings in source order
    pub warnings: Vec<DiagnosticRecord>,
}

impl SemanticAnalysis {
    /// Export as pretty-printed JSON for the IDE bridge.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
