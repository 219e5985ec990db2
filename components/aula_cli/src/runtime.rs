//! Pipeline orchestration for AulaScript analysis
//!
//! The Runtime coordinates the three analysis stages and the reporter:
//! - Lexer for tokens and lexical errors
//! - Parser for the AST and syntax errors
//! - SemanticAnalyzer for the symbol table, errors and warnings
//! - Reporter for the Spanish report sections and JSON structures

use crate::error::CliResult;
use analyzer::SemanticAnalyzer;
use core_types::Diagnostic;
use parser::{Lexer, Parser, TokenKind};
use reporter::{DiagnosticRecord, LexicalAnalysis, SemanticAnalysis};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Lexical/syntactic analysis entry point.
///
/// Runs the lexer and the parser over the source and renders both report
/// sections. The pipeline itself never fails on user input; an internal
/// failure yields empty reports and a `None` AST.
pub fn lexical_analysis(source: &str) -> LexicalAnalysis {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let (tokens, lex_errors) = Lexer::new(source).tokenize();
        let token_count = tokens.iter().filter(|t| t.kind != TokenKind::Eof).count();
        let (program, syntax_errors) = Parser::new(tokens.clone()).parse();

        LexicalAnalysis {
            lexical_report: reporter::lexical_report(&tokens, &lex_errors),
            syntactic_report: reporter::syntactic_report(&program, &syntax_errors),
            lexical_error_count: lex_errors.len(),
            syntax_error_count: syntax_errors.len(),
            token_count,
            ast: Some(program),
        }
    }));

    outcome.unwrap_or_else(|_| LexicalAnalysis {
        lexical_report: String::new(),
        syntactic_report: String::new(),
        lexical_error_count: 0,
        syntax_error_count: 0,
        token_count: 0,
        ast: None,
    })
}

/// Semantic analysis entry point.
///
/// Re-runs the full pipeline over the source (the analyzer consumes the
/// real parser's AST) and renders the semantic report. An internal failure
/// is converted into a single fatal error record and an empty report.
pub fn semantic_analysis(source: &str) -> SemanticAnalysis {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let (tokens, _lex_errors) = Lexer::new(source).tokenize();
        let (program, _syntax_errors) = Parser::new(tokens).parse();
        let result = SemanticAnalyzer::new().analyze(&program);

        SemanticAnalysis {
            report: reporter::semantic_report(&result),
            error_count: result.errors.len(),
            warning_count: result.warnings.len(),
            errors: result.errors.iter().map(DiagnosticRecord::from).collect(),
            warnings: result.warnings.iter().map(DiagnosticRecord::from).collect(),
        }
    }));

    outcome.unwrap_or_else(|_| {
        let fatal = Diagnostic::fatal("Internal analyzer error");
        SemanticAnalysis {
            report: String::new(),
            error_count: 1,
            warning_count: 0,
            errors: vec![DiagnosticRecord::from(&fatal)],
            warnings: Vec::new(),
        }
    })
}

/// Analysis runtime for the CLI and the REPL.
pub struct Runtime {
    /// Whether output is the JSON structures instead of the text reports
    json: bool,
    /// Whether the semantic stage runs
    semantic: bool,
}

impl Runtime {
    /// Create a runtime producing all three text reports.
    pub fn new() -> Self {
        Self {
            json: false,
            semantic: true,
        }
    }

    /// Emit JSON result structures instead of text reports.
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Enable or disable the semantic stage.
    pub fn with_semantic(mut self, enabled: bool) -> Self {
        self.semantic = enabled;
        self
    }

    /// Whether JSON output is enabled.
    pub fn is_json_enabled(&self) -> bool {
        self.json
    }

    /// Toggle JSON output (used by the REPL's `.json` command).
    pub fn toggle_json(&mut self) {
        self.json = !self.json;
    }

    /// Analyze a source file.
    pub fn analyze_file(&self, path: &str) -> CliResult<String> {
        let source = std::fs::read_to_string(path)?;
        self.analyze_source(&source)
    }

    /// Analyze a source string and render the configured output.
    pub fn analyze_source(&self, source: &str) -> CliResult<String> {
        let lexical = lexical_analysis(source);

        if self.json {
            let value = if self.semantic {
                serde_json::json!({
                    "lexical": lexical,
                    "semantic": semantic_analysis(source),
                })
            } else {
                serde_json::json!({ "lexical": lexical })
            };
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut output = String::new();
        output.push_str(&lexical.lexical_report);
        output.push('\n');
        output.push_str(&lexical.syntactic_report);
        if self.semantic {
            let semantic = semantic_analysis(source);
            output.push('\n');
            output.push_str(&semantic.report);
        }
        Ok(output)
    }

    /// Start the interactive analysis REPL.
    pub fn repl(&mut self) -> CliResult<()> {
        crate::repl::run_repl(self)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
