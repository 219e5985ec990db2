//! Pipeline property tests
//!
//! Universal invariants of the analysis pipeline: termination, position
//! monotonicity, count accuracy, scope uniqueness, determinism, recovery
//! liveness and idempotence.

use analyzer::SemanticAnalyzer;
use aula_cli::{lexical_analysis, semantic_analysis};
use parser::ast::Statement;
use parser::{Lexer, Parser, TokenKind};
use std::collections::HashSet;

/// All three stages terminate on awkward inputs (progress)
#[test]
fn property_progress_on_hostile_inputs() {
    let inputs = [
        "",
        ";;;;;",
        "@#~@#~@#",
        "((((((((((",
        "}}}}}}}}}}",
        "let let let let",
        "\"unterminated",
        "`unterminated ${",
        "/* unterminated",
        "function function function",
        "1 + + + + 2",
        "= = = = =",
    ];
    for source in inputs {
        let lexical = lexical_analysis(source);
        let _ = semantic_analysis(source);
        assert!(lexical.ast.is_some(), "pipeline survived {:?}", source);
    }
}

/// Token positions are monotonically non-decreasing (line, column) and
/// byte offsets never overlap
#[test]
fn property_position_monotonicity() {
    let source = "let x = 1;\nfunction f(a) { return a * 2; }\nconsole.log(`x ${x}`); // done";
    let (tokens, _) = Lexer::new(source).tokenize();
    for pair in tokens.windows(2) {
        if pair[1].kind == TokenKind::Eof {
            continue;
        }
        assert!(
            (pair[1].line, pair[1].column) >= (pair[0].line, pair[0].column),
            "positions regressed between {:?} and {:?}",
            pair[0],
            pair[1]
        );
        assert!(pair[1].start >= pair[0].end);
    }
}

/// Reported token_count equals the number of non-EOF tokens
#[test]
fn property_token_count_accuracy() {
    for source in ["", "let x = 1;", "a b c d e", "// only a comment"] {
        let lexical = lexical_analysis(source);
        let (tokens, _) = Lexer::new(source).tokenize();
        let expected = tokens.iter().filter(|t| t.kind != TokenKind::Eof).count();
        assert_eq!(lexical.token_count, expected);
    }
}

/// No two symbols share a name within any scope
#[test]
fn property_scope_uniqueness() {
    let source = "let x = 1; let x = 2; var x = 3; function f(a, a) { return a; } let y;";
    let (tokens, _) = Lexer::new(source).tokenize();
    let (program, _) = Parser::new(tokens).parse();
    let result = SemanticAnalyzer::new().analyze(&program);
    for scope in result.scopes.scopes() {
        let mut seen = HashSet::new();
        for symbol in &scope.symbols {
            assert!(
                seen.insert(symbol.name.clone()),
                "duplicate symbol '{}' in scope {}",
                symbol.name,
                scope.id
            );
        }
    }
}

/// Same input produces byte-identical diagnostic lists
#[test]
fn property_deterministic_output() {
    let source = "let a; let b = a; c(); if (0) { let d = 1; } while (true) { e(); }";
    let first = semantic_analysis(source);
    let second = semantic_analysis(source);
    assert_eq!(first.errors, second.errors);
    assert_eq!(first.warnings, second.warnings);
    assert_eq!(first.report, second.report);
}

/// A syntax error does not discard well-formed sibling statements
#[test]
fn property_recovery_liveness() {
    let source = "let a = 1;\nlet b = ;\nlet c = 3;\nlet d = 4;";
    let (tokens, _) = Lexer::new(source).tokenize();
    let (program, errors) = Parser::new(tokens).parse();
    assert!(!errors.is_empty());

    let survivors: Vec<&str> = program
        .body
        .iter()
        .filter_map(|s| match s {
            Statement::VariableDeclaration { declarations, .. } => {
                Some(declarations[0].id.name.as_str())
            }
            _ => None,
        })
        .collect();
    assert!(survivors.contains(&"a"));
    assert!(survivors.contains(&"c"));
    assert!(survivors.contains(&"d"));
}

/// A whitespace/comment-only source has no errors and no significant tokens
#[test]
fn property_trivia_only_source() {
    for source in ["", "   \n\t  ", "// comment\n", "/* block */ // line"] {
        let (tokens, errors) = Lexer::new(source).tokenize();
        assert!(errors.is_empty());
        let significant = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Comment && t.kind != TokenKind::Eof)
            .count();
        assert_eq!(significant, 0);
    }
}

/// Re-running the analyzer on the same source yields identical lists
#[test]
fn property_reanalysis_idempotent() {
    let source = "function f() { let unused; return 1; } f();";
    let runs: Vec<_> = (0..3).map(|_| semantic_analysis(source)).collect();
    assert_eq!(runs[0].errors, runs[1].errors);
    assert_eq!(runs[1].errors, runs[2].errors);
    assert_eq!(runs[0].warnings, runs[1].warnings);
    assert_eq!(runs[1].warnings, runs[2].warnings);
}

/// Boundary: empty source yields an empty program and no diagnostics
#[test]
fn boundary_empty_source() {
    let lexical = lexical_analysis("");
    assert_eq!(lexical.token_count, 0);
    assert_eq!(lexical.lexical_error_count, 0);
    assert_eq!(lexical.syntax_error_count, 0);
    assert!(lexical.ast.expect("ast").body.is_empty());
}

/// Boundary: a lone unterminated string produces exactly one lexical
/// error and the parser sees EOF immediately
#[test]
fn boundary_unterminated_string() {
    let lexical = lexical_analysis("\"abc");
    assert_eq!(lexical.lexical_error_count, 1);
    assert_eq!(lexical.token_count, 0);
    assert_eq!(lexical.syntax_error_count, 0);
    assert!(lexical.ast.expect("ast").body.is_empty());
}

/// Boundary: deeply nested expressions parse without stack explosion
#[test]
fn boundary_deep_nesting() {
    let depth = 120;
    let mut source = String::new();
    for _ in 0..depth {
        source.push('(');
    }
    source.push('1');
    for _ in 0..depth {
        source.push(')');
    }
    source.push(';');

    let lexical = lexical_analysis(&source);
    assert_eq!(lexical.syntax_error_count, 0);
    assert_eq!(lexical.ast.expect("ast").body.len(), 1);
}
