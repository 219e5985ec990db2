//! Full Pipeline Integration Tests
//!
//! Tests the complete flow: Source -> Lexer -> Parser -> Analyzer ->
//! Reporter. Each test drives the same entry points the teaching IDE
//! bridge uses.

use aula_cli::{lexical_analysis, semantic_analysis};

/// Helper to collect semantic diagnostic messages
fn error_messages(source: &str) -> Vec<String> {
    semantic_analysis(source)
        .errors
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

/// Helper to collect semantic warning messages
fn warning_messages(source: &str) -> Vec<String> {
    semantic_analysis(source)
        .warnings
        .iter()
        .map(|w| w.message.clone())
        .collect()
}

/// Scenario: unused const declaration
#[test]
fn test_unused_const_declaration() {
    let source = "const PI = 3.14;";
    let lexical = lexical_analysis(source);
    assert_eq!(lexical.token_count, 5);
    assert_eq!(lexical.lexical_error_count, 0);
    assert_eq!(lexical.syntax_error_count, 0);

    let semantic = semantic_analysis(source);
    assert_eq!(semantic.error_count, 0);
    assert_eq!(semantic.warning_count, 1);
    assert_eq!(
        semantic.warnings[0].message,
        "Variable 'PI' is declared but never used"
    );
}

/// Scenario: deferred initialization through assignment
#[test]
fn test_assignment_initializes_binding() {
    let semantic = semantic_analysis("let x; x = 1;");
    assert_eq!(semantic.error_count, 0);
    assert_eq!(semantic.warning_count, 0);
    // The symbol table shows x as initialized
    assert!(semantic.report.contains("x"));
    assert!(!semantic.report.contains("used before being initialized"));
}

/// Scenario: const reassignment
#[test]
fn test_const_reassignment_error() {
    assert_eq!(
        error_messages("const K = 1; K = 2;"),
        vec!["Cannot assign to const variable 'K'"]
    );
}

/// Scenario: call of an undeclared function
#[test]
fn test_undeclared_call_error() {
    assert_eq!(error_messages("foo();"), vec!["'foo' is not defined"]);
}

/// Scenario: wrong argument count
#[test]
fn test_arity_mismatch_warning() {
    let source = "function f(a, b) { return a + b; } f(1);";
    assert!(error_messages(source).is_empty());
    assert_eq!(
        warning_messages(source),
        vec!["Function 'f' expects 2 arguments, got 1"]
    );
}

/// Scenario: always-truthy condition plus unused binding
#[test]
fn test_truthy_condition_and_unused_binding() {
    assert_eq!(
        warning_messages("if (true) { let y = 1; }"),
        vec![
            "Condition is always truthy",
            "Variable 'y' is declared but never used"
        ]
    );
}

/// Scenario: string + number arithmetic
#[test]
fn test_string_number_addition_warning() {
    assert_eq!(
        warning_messages("let s = \"a\"; let n = 1; s + n;"),
        vec!["Adding string and number might produce unexpected results"]
    );
}

/// Scenario: infinite loop
#[test]
fn test_infinite_loop_warning() {
    assert_eq!(
        warning_messages("while (1) {}"),
        vec!["Potential infinite loop: condition is always truthy"]
    );
}

/// Scenario: duplicate keys in an object-expression initializer
#[test]
fn test_duplicate_object_key_warning() {
    let warnings = warning_messages("let o = { a: 1, a: 2 }; o;");
    assert_eq!(warnings, vec!["Duplicate key 'a' in object literal"]);
}

/// The semantic entry point runs the real parser, so hoisting is visible
/// to calls that appear before the declaration
#[test]
fn test_hoisting_across_pipeline() {
    let source = "let r = twice(2); console.log(r); function twice(n) { return n * 2; }";
    let semantic = semantic_analysis(source);
    assert_eq!(semantic.error_count, 0);
    assert_eq!(semantic.warning_count, 0);
}

/// Diagnostics carry positions the IDE can map back onto the editor
#[test]
fn test_diagnostic_positions() {
    let semantic = semantic_analysis("let a = 1;\nghost = 2;");
    assert_eq!(semantic.error_count, 1);
    assert_eq!(semantic.errors[0].line, 2);
    assert_eq!(semantic.errors[0].column, 1);
}

/// Reports embed the exact section headers the IDE displays verbatim
#[test]
fn test_report_section_headers() {
    let source = "let x = 1; x;";
    let lexical = lexical_analysis(source);
    let semantic = semantic_analysis(source);
    assert!(lexical.lexical_report.starts_with("=== ANÁLISIS LÉXICO ==="));
    assert!(lexical
        .syntactic_report
        .starts_with("=== ANÁLISIS SINTÁCTICO ==="));
    assert!(semantic.report.starts_with("=== ANÁLISIS SEMÁNTICO ==="));
}

/// The lexical entry point exposes a serializable AST
#[test]
fn test_ast_serialization() {
    let lexical = lexical_analysis("let x = [1, , 2];");
    let ast = lexical.ast.expect("ast present");
    let json = serde_json::to_string(&ast).expect("serializable");
    assert!(json.contains("VariableDeclaration"));
    assert!(json.contains("ArrayExpression"));
}

/// A program mixing every statement form analyzes cleanly
#[test]
fn test_mixed_program() {
    let source = r#"
        function clamp(value, low, high) {
            if (value < low) {
                return low;
            } else {
                if (value > high) {
                    return high;
                }
            }
            return value;
        }

        let total = 0;
        for (let i = 0; i < 10; i++) {
            total += clamp(i, 2, 8);
        }
        while (total > 100) {
            total -= 10;
        }
        console.log(`total: ${total}`);
    "#;
    let lexical = lexical_analysis(source);
    assert_eq!(lexical.lexical_error_count, 0);
    assert_eq!(lexical.syntax_error_count, 0);

    let semantic = semantic_analysis(source);
    assert_eq!(semantic.error_count, 0);
    assert_eq!(semantic.warning_count, 0);
}
