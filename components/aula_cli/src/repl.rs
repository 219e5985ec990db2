//! Interactive analysis REPL
//!
//! Reads source snippets line by line and prints the analysis reports for
//! each finished snippet. Whether a snippet is finished is decided by the
//! real lexer: an unterminated string, template or block comment, or an
//! open `{`, `(` or `[` token, keeps the prompt in continuation mode.

use crate::error::{CliError, CliResult};
use crate::runtime::Runtime;
use parser::{Lexer, TokenKind};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run the interactive REPL over the given runtime.
pub fn run_repl(runtime: &mut Runtime) -> CliResult<()> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| CliError::ReplError(format!("Failed to initialize editor: {}", e)))?;

    println!("AulaScript Analyzer v0.1.0");
    println!("Type source code to analyze it, or '.help' for commands.");
    println!();

    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { "> " } else { "... " };

        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if buffer.is_empty() {
                    println!("Press Ctrl-D or type 'exit' to quit");
                } else {
                    println!("^C");
                    buffer.clear();
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                return Ok(());
            }
            Err(err) => {
                return Err(CliError::ReplError(format!("Readline error: {}", err)));
            }
        };

        // Commands are only recognized at a fresh prompt
        if buffer.is_empty() {
            let trimmed = line.trim();
            if trimmed == "exit" || trimmed == "quit" || trimmed == ".exit" {
                println!("Goodbye!");
                return Ok(());
            }
            if let Some(command) = trimmed.strip_prefix('.') {
                run_command(command, runtime);
                continue;
            }
        }

        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&line);

        if !is_input_complete(&buffer) {
            continue;
        }

        let snippet = std::mem::take(&mut buffer);
        let _ = editor.add_history_entry(&snippet);
        match runtime.analyze_source(&snippet) {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

/// Handle a `.command` line entered at a fresh prompt.
fn run_command(command: &str, runtime: &mut Runtime) {
    match command {
        "help" => {
            println!(".help   show this help");
            println!(".clear  clear the screen");
            println!(".json   toggle JSON output");
            println!(".exit   leave the REPL");
        }
        "clear" => {
            print!("\x1B[2J\x1B[1;1H");
        }
        "json" => {
            runtime.toggle_json();
            let state = if runtime.is_json_enabled() {
                "enabled"
            } else {
                "disabled"
            };
            println!("JSON output {}", state);
        }
        other => {
            println!("Unknown command '.{}'; type .help for the list", other);
        }
    }
}

/// A snippet is complete when the lexer closes every string, template and
/// comment, and no `{`, `(` or `[` token is left open.
///
/// Tokenizing the buffer reuses the lexer's escape and interpolation
/// handling, so braces inside literals never count toward nesting.
fn is_input_complete(input: &str) -> bool {
    let (tokens, errors) = Lexer::new(input).tokenize();

    if errors.iter().any(|e| e.message.starts_with("Unterminated")) {
        return false;
    }

    let mut open = 0i32;
    for token in tokens.iter().filter(|t| t.kind == TokenKind::Punctuator) {
        match token.lexeme.as_str() {
            "{" | "(" | "[" => open += 1,
            "}" | ")" | "]" => open -= 1,
            _ => {}
        }
    }
    open <= 0
}
