//! Runtime analysis tests
//!
//! Exercise the full pipeline through the Runtime, including file-based
//! analysis via a temporary file.

use aula_cli::{lexical_analysis, semantic_analysis, Runtime};
use std::io::Write;

#[test]
fn analyze_file_produces_all_sections() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "function add(a, b) {{ return a + b; }}").expect("write");
    writeln!(file, "let total = add(1, 2);").expect("write");
    writeln!(file, "console.log(total);").expect("write");

    let runtime = Runtime::new();
    let output = runtime
        .analyze_file(file.path().to_str().expect("utf-8 path"))
        .expect("analysis");

    assert!(output.contains("=== ANÁLISIS LÉXICO ==="));
    assert!(output.contains("=== ANÁLISIS SINTÁCTICO ==="));
    assert!(output.contains("=== ANÁLISIS SEMÁNTICO ==="));
    assert!(output.contains("Errores semánticos: 0"));
}

#[test]
fn analyze_missing_file_is_io_error() {
    let runtime = Runtime::new();
    let result = runtime.analyze_file("/nonexistent/path/script.js");
    assert!(matches!(result, Err(aula_cli::CliError::IoError(_))));
}

#[test]
fn lexical_entry_point_counts_tokens() {
    let analysis = lexical_analysis("const PI = 3.14;");
    assert_eq!(analysis.token_count, 5);
    assert_eq!(analysis.lexical_error_count, 0);
    assert_eq!(analysis.syntax_error_count, 0);
}

#[test]
fn semantic_entry_point_reports_unused() {
    let analysis = semantic_analysis("const PI = 3.14;");
    assert_eq!(analysis.error_count, 0);
    assert_eq!(analysis.warning_count, 1);
    assert_eq!(
        analysis.warnings[0].message,
        "Variable 'PI' is declared but never used"
    );
}

#[test]
fn json_output_round_trips() {
    let runtime = Runtime::new().with_json(true);
    let output = runtime
        .analyze_source("let x = 1; console.log(x);")
        .expect("analysis");
    let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
    assert_eq!(value["semantic"]["error_count"], 0);
    assert!(value["lexical"]["ast"].is_object());
}

#[test]
fn syntax_error_source_still_produces_reports() {
    let runtime = Runtime::new();
    let output = runtime.analyze_source("let x = ;").expect("analysis");
    assert!(output.contains("Errores sintácticos: 1"));
    assert!(output.contains("Unexpected token: ';'"));
}
