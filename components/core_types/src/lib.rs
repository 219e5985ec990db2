//! Core source-location and diagnostic types.
//!
//! This crate provides the foundational types shared by every stage of the
//! AulaScript analysis pipeline: source positions, diagnostic severities,
//! and the diagnostic records that the lexer, parser and semantic analyzer
//! accumulate.
//!
//! # Overview
//!
//! - [`SourcePosition`] - Source code location
//! - [`Severity`] - Diagnostic severity (error or warning)
//! - [`Diagnostic`] - A positioned error or warning record
//!
//! # Examples
//!
//! ```
//! use core_types::{Diagnostic, Severity, SourcePosition};
//!
//! let pos = SourcePosition { line: 3, column: 7, offset: 42 };
//! let diag = Diagnostic::error("'foo' is not defined", pos);
//!
//! assert_eq!(diag.severity, Severity::Error);
//! assert_eq!(diag.line, 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod diagnostic;
mod source;

pub use diagnostic::{Diagnostic, Severity};
pub use source::SourcePosition;
