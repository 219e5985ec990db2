//! AulaScript Semantic Analyzer Component
//!
//! Walks the AST produced by the `parser` crate, maintains a hierarchical
//! symbol table, hoists function declarations, and checks usage,
//! initialization, redeclaration and const immutability, emitting style
//! warnings along the way.
//!
//! # Overview
//!
//! - [`SemanticAnalyzer`] - The AST walker producing diagnostics
//! - [`AnalysisResult`] - Scope tree plus ordered error/warning lists
//! - [`ScopeTree`] / [`Scope`] - Arena-indexed scope tree
//! - [`SymbolInfo`] / [`SymbolKind`] - Symbol metadata
//!
//! # Example
//!
//! ```
//! use analyzer::SemanticAnalyzer;
//! use parser::{Lexer, Parser};
//!
//! let (tokens, _) = Lexer::new("const PI = 3.14;").tokenize();
//! let (program, _) = Parser::new(tokens).parse();
//! let result = SemanticAnalyzer::new().analyze(&program);
//!
//! assert!(result.errors.is_empty());
//! assert_eq!(result.warnings.len(), 1); // PI is never used
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod scope;
pub mod semantic;

pub use scope::{Scope, ScopeKind, ScopeTree, SymbolInfo, SymbolKind, ValueClass, BUILTINS};
pub use semantic::{AnalysisResult, SemanticAnalyzer};
