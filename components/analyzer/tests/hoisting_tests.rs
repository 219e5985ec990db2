//! Hoisting and scope-shape tests
//!
//! Behavioral tests for function hoisting, scope nesting and the symbol
//! flags the analyzer records.

use analyzer::{AnalysisResult, ScopeKind, SemanticAnalyzer, SymbolKind};
use parser::{Lexer, Parser};

fn analyze(source: &str) -> AnalysisResult {
    let (tokens, _) = Lexer::new(source).tokenize();
    let (program, _) = Parser::new(tokens).parse();
    SemanticAnalyzer::new().analyze(&program)
}

#[test]
fn hoisted_function_is_visible_before_its_declaration() {
    let result = analyze("let x = helper(); x; function helper() { return 1; }");
    assert!(result.errors.is_empty());
    let global = &result.scopes.scopes()[0];
    let helper = global.symbols.iter().find(|s| s.name == "helper").unwrap();
    assert_eq!(helper.kind, SymbolKind::Function);
    assert!(helper.hoisted);
    assert!(helper.initialized);
    assert!(helper.used);
}

#[test]
fn hoisting_captures_parameter_names() {
    let result = analyze("function area(w, h) { return w * h; } area(2, 3);");
    let global = &result.scopes.scopes()[0];
    let area = global.symbols.iter().find(|s| s.name == "area").unwrap();
    assert_eq!(
        area.params.as_deref(),
        Some(&["w".to_string(), "h".to_string()][..])
    );
}

#[test]
fn hoist_collision_is_reported() {
    let result = analyze("function f() { return 1; } function f() { return 2; }");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].message,
        "Variable 'f' is already declared in this scope"
    );
}

#[test]
fn function_body_creates_function_scope_with_parameters() {
    let result = analyze("function f(a) { let b = a; return b; } f(1);");
    let scopes = result.scopes.scopes();
    assert_eq!(scopes.len(), 2);
    assert_eq!(scopes[1].kind, ScopeKind::Function);
    let names: Vec<&str> = scopes[1].symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(scopes[1].symbols[0].kind, SymbolKind::Parameter);
}

#[test]
fn block_function_declarations_follow_the_regular_walk() {
    // Not hoisted: the call precedes the declaration inside the block
    let result = analyze("{ g(); function g() { return 1; } }");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message, "'g' is not defined");
}

#[test]
fn for_header_declarations_are_loop_scoped() {
    let result = analyze("for (let i = 0; i < 2; i++) { i; }");
    let scopes = result.scopes.scopes();
    // global -> for header (block) -> loop body (block)
    assert_eq!(scopes.len(), 3);
    assert_eq!(scopes[1].kind, ScopeKind::Block);
    assert!(scopes[1].symbols.iter().any(|s| s.name == "i"));
    assert!(scopes[2].symbols.is_empty());
}

#[test]
fn nested_scopes_resolve_through_the_chain() {
    let result = analyze(
        "let outer = 1; function f() { { { outer = outer + 1; } } return outer; } f();",
    );
    assert!(result.errors.is_empty());
    let global = &result.scopes.scopes()[0];
    let outer = global.symbols.iter().find(|s| s.name == "outer").unwrap();
    assert!(outer.used);
    assert!(outer.initialized);
}

#[test]
fn initialized_flag_never_reverts() {
    // Assigning twice keeps the flag set (invariant: false -> true once)
    let result = analyze("let x; x = 1; x = 2; x;");
    assert!(result.errors.is_empty());
    let global = &result.scopes.scopes()[0];
    let x = global.symbols.iter().find(|s| s.name == "x").unwrap();
    assert!(x.initialized);
}
