//! AulaScript Analyzer CLI Library
//!
//! Provides the [`Runtime`] orchestrating the analysis pipeline, the two
//! analysis entry points used by the teaching IDE bridge, and the CLI and
//! REPL surfaces.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod repl;
pub mod runtime;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use runtime::{lexical_analysis, semantic_analysis, Runtime};
