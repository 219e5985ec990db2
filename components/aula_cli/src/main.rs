//! AulaScript Analyzer CLI
//!
//! Entry point for the analyzer. Parses CLI arguments and delegates to the
//! Runtime, which drives the lexer, parser, semantic analyzer and reporter.

use aula_cli::{Cli, CliError, Runtime};
use clap::Parser as ClapParser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut runtime = Runtime::new()
        .with_json(cli.json)
        .with_semantic(!cli.no_semantic);

    if let Some(file) = cli.file {
        match runtime.analyze_file(&file) {
            Ok(output) => println!("{}", output),
            Err(CliError::IoError(e)) => {
                eprintln!("Error: Could not read file '{}': {}", file, e);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else if let Some(code) = cli.eval {
        match runtime.analyze_source(&code) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else if cli.repl {
        runtime.repl()?;
    } else {
        println!("AulaScript Analyzer v0.1.0");
        println!();
        println!("Usage:");
        println!("  aula-js --file <FILE>     Analyze a source file");
        println!("  aula-js --eval <CODE>     Analyze inline source code");
        println!("  aula-js --repl            Start the interactive analysis REPL");
        println!();
        println!("Run 'aula-js --help' for more options.");
    }

    Ok(())
}
