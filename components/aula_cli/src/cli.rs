//! Command-line argument definitions

use clap::Parser;

/// AulaScript analyzer - lexical, syntactic and semantic analysis for the
/// teaching IDE dialect.
#[derive(Parser, Debug)]
#[command(name = "aula-js", version, about)]
pub struct Cli {
    /// Analyze a source file
    #[arg(short, long)]
    pub file: Option<String>,

    /// Analyze inline source code
    #[arg(short, long)]
    pub eval: Option<String>,

    /// Start the interactive analysis REPL
    #[arg(short, long)]
    pub repl: bool,

    /// Emit the analysis result structures as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the semantic stage and report only lexical/syntactic results
    #[arg(long)]
    pub no_semantic: bool,
}
