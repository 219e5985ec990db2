//! Spanish textual report rendering
//!
//! Pure formatters over the lexer, parser and analyzer outputs. The IDE
//! displays the returned strings verbatim, so section headers and line
//! formats are part of the external contract.

use analyzer::AnalysisResult;
use core_types::Diagnostic;
use parser::ast::{Expression, ForInit, Statement};
use parser::{Program, Token, TokenKind};
use std::fmt::Write;

/// The token table shows at most this many rows.
const TOKEN_TABLE_LIMIT: usize = 50;

/// Render the `=== ANÁLISIS LÉXICO ===` section: counts, enumerated
/// errors, the token table and a statistics footer.
pub fn lexical_report(tokens: &[Token], errors: &[Diagnostic]) -> String {
    let visible: Vec<&Token> = tokens.iter().filter(|t| t.kind != TokenKind::Eof).collect();

    let mut out = String::from("=== ANÁLISIS LÉXICO ===\n\n");
    let _ = writeln!(out, "Total de tokens: {}", visible.len());
    let _ = writeln!(out, "Errores léxicos: {}", errors.len());

    if !errors.is_empty() {
        out.push_str("\nErrores:\n");
        push_diagnostics(&mut out, errors);
    }

    if !visible.is_empty() {
        out.push_str("\nTokens:\n");
        let _ = writeln!(
            out,
            "{:<5} {:<12} {:<30} {:<7} {:<7}",
            "#", "TIPO", "LEXEMA", "LÍNEA", "COLUMNA"
        );
        for (index, token) in visible.iter().take(TOKEN_TABLE_LIMIT).enumerate() {
            let _ = writeln!(
                out,
                "{:<5} {:<12} {:<30} {:<7} {:<7}",
                index + 1,
                token.kind.to_string(),
                display_lexeme(&token.lexeme),
                token.line,
                token.column
            );
        }
        if visible.len() > TOKEN_TABLE_LIMIT {
            let _ = writeln!(out, "... y {} tokens más", visible.len() - TOKEN_TABLE_LIMIT);
        }
    }

    out.push_str("\nEstadísticas:\n");
    let _ = writeln!(
        out,
        "  Palabras clave: {}",
        count_kind(&visible, TokenKind::Keyword)
    );
    let _ = writeln!(
        out,
        "  Identificadores: {}",
        count_kind(&visible, TokenKind::Identifier)
    );
    let _ = writeln!(out, "  Números: {}", count_kind(&visible, TokenKind::Number));
    let _ = writeln!(out, "  Cadenas: {}", count_kind(&visible, TokenKind::String));
    let _ = writeln!(
        out,
        "  Plantillas: {}",
        count_kind(&visible, TokenKind::Template)
    );
    let _ = writeln!(
        out,
        "  Operadores: {}",
        count_kind(&visible, TokenKind::Operator)
    );
    let _ = writeln!(
        out,
        "  Puntuadores: {}",
        count_kind(&visible, TokenKind::Punctuator)
    );
    let _ = writeln!(
        out,
        "  Comentarios: {}",
        count_kind(&visible, TokenKind::Comment)
    );

    out
}

/// Render the `=== ANÁLISIS SINTÁCTICO ===` section: counts, enumerated
/// errors, an AST pretty-print and a statistics footer.
pub fn syntactic_report(program: &Program, errors: &[Diagnostic]) -> String {
    let mut out = String::from("=== ANÁLISIS SINTÁCTICO ===\n\n");
    let _ = writeln!(out, "Errores sintácticos: {}", errors.len());

    if !errors.is_empty() {
        out.push_str("\nErrores:\n");
        push_diagnostics(&mut out, errors);
    }

    out.push_str("\nÁrbol de sintaxis abstracta:\n");
    out.push_str("Program\n");
    for stmt in &program.body {
        push_statement(&mut out, stmt, 1);
    }

    let nodes: usize = program.body.iter().map(count_statement).sum::<usize>() + 1;
    out.push_str("\nEstadísticas:\n");
    let _ = writeln!(
        out,
        "  Sentencias de nivel superior: {}",
        program.body.len()
    );
    let _ = writeln!(out, "  Nodos del árbol: {}", nodes);

    out
}

/// Render the `=== ANÁLISIS SEMÁNTICO ===` section: counts, enumerated
/// errors and warnings, the symbol table and a statistics footer.
pub fn semantic_report(result: &AnalysisResult) -> String {
    let mut out = String::from("=== ANÁLISIS SEMÁNTICO ===\n\n");
    let _ = writeln!(out, "Errores semánticos: {}", result.errors.len());
    let _ = writeln!(out, "Advertencias: {}", result.warnings.len());

    if !result.errors.is_empty() {
        out.push_str("\nErrores:\n");
        push_diagnostics(&mut out, &result.errors);
    }
    if !result.warnings.is_empty() {
        out.push_str("\nAdvertencias:\n");
        push_diagnostics(&mut out, &result.warnings);
    }

    out.push_str("\nTabla de símbolos:\n");
    let mut rows = 0usize;
    let _ = writeln!(
        out,
        "{:<12} {:<16} {:<10} {:<7} {:<13} {:<6}",
        "ÁMBITO", "NOMBRE", "TIPO", "LÍNEA", "INICIALIZADA", "USADA"
    );
    for scope in result.scopes.scopes() {
        let scope_label = if scope.parent.is_none() {
            "global".to_string()
        } else {
            format!("{}#{}", scope.kind, scope.id)
        };
        for symbol in scope.symbols.iter().filter(|s| !s.builtin) {
            let _ = writeln!(
                out,
                "{:<12} {:<16} {:<10} {:<7} {:<13} {:<6}",
                scope_label,
                symbol.name,
                symbol.kind.to_string(),
                symbol.line,
                if symbol.initialized { "sí" } else { "no" },
                if symbol.used { "sí" } else { "no" }
            );
            rows += 1;
        }
    }
    if rows == 0 {
        out.push_str("  (sin símbolos declarados)\n");
    }

    out.push_str("\nEstadísticas:\n");
    let _ = writeln!(out, "  Símbolos declarados: {}", rows);
    let _ = writeln!(out, "  Ámbitos creados: {}", result.scopes.scopes().len());

    out
}

/// `N. [Línea L, Columna C] <message>` lines, one per diagnostic.
fn push_diagnostics(out: &mut String, diagnostics: &[Diagnostic]) {
    for (index, diag) in diagnostics.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [Línea {}, Columna {}] {}",
            index + 1,
            diag.line,
            diag.column,
            diag.message
        );
    }
}

/// Lexemes are shown on one table row: control characters are escaped and
/// long lexemes are truncated.
fn display_lexeme(lexeme: &str) -> String {
    let cleaned = lexeme
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r");
    if cleaned.chars().count() > 28 {
        let prefix: String = cleaned.chars().take(25).collect();
        format!("{}...", prefix)
    } else {
        cleaned
    }
}

fn count_kind(tokens: &[&Token], kind: TokenKind) -> usize {
    tokens.iter().filter(|t| t.kind == kind).count()
}

// =============================================================================
// AST pretty-printer
// =============================================================================

fn push_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

fn push_statement(out: &mut String, stmt: &Statement, depth: usize) {
    let pos = stmt.position();
    match stmt {
        Statement::VariableDeclaration {
            kind, declarations, ..
        } => {
            push_line(
                out,
                depth,
                &format!("VariableDeclaration ({}) [{}:{}]", kind, pos.line, pos.column),
            );
            for decl in declarations {
                push_line(
                    out,
                    depth + 1,
                    &format!("VariableDeclarator '{}'", decl.id.name),
                );
                if let Some(init) = &decl.init {
                    push_expression(out, init, depth + 2);
                }
            }
        }
        Statement::FunctionDeclaration {
            id, params, body, ..
        } => {
            let params: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
            push_line(
                out,
                depth,
                &format!(
                    "FunctionDeclaration '{}' ({}) [{}:{}]",
                    id.name,
                    params.join(", "),
                    pos.line,
                    pos.column
                ),
            );
            for stmt in body {
                push_statement(out, stmt, depth + 1);
            }
        }
        Statement::BlockStatement { body, .. } => {
            push_line(out, depth, &format!("BlockStatement [{}:{}]", pos.line, pos.column));
            for stmt in body {
                push_statement(out, stmt, depth + 1);
            }
        }
        Statement::ExpressionStatement { expression, .. } => {
            push_line(
                out,
                depth,
                &format!("ExpressionStatement [{}:{}]", pos.line, pos.column),
            );
            push_expression(out, expression, depth + 1);
        }
        Statement::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } => {
            push_line(out, depth, &format!("IfStatement [{}:{}]", pos.line, pos.column));
            push_expression(out, test, depth + 1);
            push_statement(out, consequent, depth + 1);
            if let Some(alt) = alternate {
                push_statement(out, alt, depth + 1);
            }
        }
        Statement::WhileStatement { test, body, .. } => {
            push_line(
                out,
                depth,
                &format!("WhileStatement [{}:{}]", pos.line, pos.column),
            );
            push_expression(out, test, depth + 1);
            push_statement(out, body, depth + 1);
        }
        Statement::ForStatement {
            init,
            test,
            update,
            body,
            ..
        } => {
            push_line(out, depth, &format!("ForStatement [{}:{}]", pos.line, pos.column));
            match init {
                Some(ForInit::VariableDeclaration {
                    kind, declarations, ..
                }) => {
                    push_line(out, depth + 1, &format!("VariableDeclaration ({})", kind));
                    for decl in declarations {
                        push_line(
                            out,
                            depth + 2,
                            &format!("VariableDeclarator '{}'", decl.id.name),
                        );
                        if let Some(init) = &decl.init {
                            push_expression(out, init, depth + 3);
                        }
                    }
                }
                Some(ForInit::Expression(expr)) => push_expression(out, expr, depth + 1),
                None => {}
            }
            if let Some(test) = test {
                push_expression(out, test, depth + 1);
            }
            if let Some(update) = update {
                push_expression(out, update, depth + 1);
            }
            push_statement(out, body, depth + 1);
        }
        Statement::ReturnStatement { argument, .. } => {
            push_line(
                out,
                depth,
                &format!("ReturnStatement [{}:{}]", pos.line, pos.column),
            );
            if let Some(arg) = argument {
                push_expression(out, arg, depth + 1);
            }
        }
    }
}

fn push_expression(out: &mut String, expr: &Expression, depth: usize) {
    match expr {
        Expression::Identifier { name, .. } => {
            push_line(out, depth, &format!("Identifier '{}'", name));
        }
        Expression::Literal { raw, .. } => {
            push_line(out, depth, &format!("Literal {}", display_lexeme(raw)));
        }
        Expression::TemplateLiteral { raw, .. } => {
            push_line(out, depth, &format!("TemplateLiteral {}", display_lexeme(raw)));
        }
        Expression::AssignmentExpression {
            operator,
            left,
            right,
            ..
        } => {
            push_line(out, depth, &format!("AssignmentExpression '{}'", operator));
            push_expression(out, left, depth + 1);
            push_expression(out, right, depth + 1);
        }
        Expression::ConditionalExpression {
            test,
            consequent,
            alternate,
            ..
        } => {
            push_line(out, depth, "ConditionalExpression");
            push_expression(out, test, depth + 1);
            push_expression(out, consequent, depth + 1);
            push_expression(out, alternate, depth + 1);
        }
        Expression::LogicalExpression {
            operator,
            left,
            right,
            ..
        } => {
            push_line(out, depth, &format!("LogicalExpression '{}'", operator));
            push_expression(out, left, depth + 1);
            push_expression(out, right, depth + 1);
        }
        Expression::BinaryExpression {
            operator,
            left,
            right,
            ..
        } => {
            push_line(out, depth, &format!("BinaryExpression '{}'", operator));
            push_expression(out, left, depth + 1);
            push_expression(out, right, depth + 1);
        }
        Expression::UnaryExpression {
            operator, argument, ..
        } => {
            push_line(out, depth, &format!("UnaryExpression '{}'", operator));
            push_expression(out, argument, depth + 1);
        }
        Expression::UpdateExpression {
            operator,
            argument,
            prefix,
            ..
        } => {
            let form = if *prefix { "prefijo" } else { "postfijo" };
            push_line(
                out,
                depth,
                &format!("UpdateExpression '{}' ({})", operator, form),
            );
            push_expression(out, argument, depth + 1);
        }
        Expression::CallExpression {
            callee, arguments, ..
        } => {
            push_line(
                out,
                depth,
                &format!("CallExpression ({} argumentos)", arguments.len()),
            );
            push_expression(out, callee, depth + 1);
            for arg in arguments {
                push_expression(out, arg, depth + 1);
            }
        }
        Expression::MemberExpression {
            object,
            property,
            computed,
            ..
        } => {
            let access = if *computed { "computado" } else { "directo" };
            push_line(out, depth, &format!("MemberExpression ({})", access));
            push_expression(out, object, depth + 1);
            push_expression(out, property, depth + 1);
        }
        Expression::ArrayExpression { elements, .. } => {
            push_line(
                out,
                depth,
                &format!("ArrayExpression ({} elementos)", elements.len()),
            );
            for element in elements {
                match element {
                    Some(expr) => push_expression(out, expr, depth + 1),
                    None => push_line(out, depth + 1, "<hueco>"),
                }
            }
        }
        Expression::ObjectExpression { properties, .. } => {
            push_line(
                out,
                depth,
                &format!("ObjectExpression ({} propiedades)", properties.len()),
            );
            for prop in properties {
                push_line(out, depth + 1, &format!("Property '{}'", prop.key.text()));
                push_expression(out, &prop.value, depth + 2);
            }
        }
    }
}

// =============================================================================
// Node counting for the statistics footer
// =============================================================================

fn count_statement(stmt: &Statement) -> usize {
    match stmt {
        Statement::VariableDeclaration { declarations, .. } => {
            1 + declarations
                .iter()
                .map(|d| 1 + d.init.as_ref().map_or(0, count_expression))
                .sum::<usize>()
        }
        Statement::FunctionDeclaration { body, .. } => {
            1 + body.iter().map(count_statement).sum::<usize>()
        }
        Statement::BlockStatement { body, .. } => {
            1 + body.iter().map(count_statement).sum::<usize>()
        }
        Statement::ExpressionStatement { expression, .. } => 1 + count_expression(expression),
        Statement::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } => {
            1 + count_expression(test)
                + count_statement(consequent)
                + alternate.as_deref().map_or(0, count_statement)
        }
        Statement::WhileStatement { test, body, .. } => {
            1 + count_expression(test) + count_statement(body)
        }
        Statement::ForStatement {
            init,
            test,
            update,
            body,
            ..
        } => {
            let init_count = match init {
                Some(ForInit::VariableDeclaration { declarations, .. }) => {
                    1 + declarations
                        .iter()
                        .map(|d| 1 + d.init.as_ref().map_or(0, count_expression))
                        .sum::<usize>()
                }
                Some(ForInit::Expression(expr)) => count_expression(expr),
                None => 0,
            };
            1 + init_count
                + test.as_ref().map_or(0, count_expression)
                + update.as_ref().map_or(0, count_expression)
                + count_statement(body)
        }
        Statement::ReturnStatement { argument, .. } => {
            1 + argument.as_ref().map_or(0, count_expression)
        }
    }
}

fn count_expression(expr: &Expression) -> usize {
    match expr {
        Expression::Identifier { .. }
        | Expression::Literal { .. }
        | Expression::TemplateLiteral { .. } => 1,
        Expression::AssignmentExpression { left, right, .. }
        | Expression::LogicalExpression { left, right, .. }
        | Expression::BinaryExpression { left, right, .. } => {
            1 + count_expression(left) + count_expression(right)
        }
        Expression::ConditionalExpression {
            test,
            consequent,
            alternate,
            ..
        } => 1 + count_expression(test) + count_expression(consequent) + count_expression(alternate),
        Expression::UnaryExpression { argument, .. }
        | Expression::UpdateExpression { argument, .. } => 1 + count_expression(argument),
        Expression::CallExpression {
            callee, arguments, ..
        } => 1 + count_expression(callee) + arguments.iter().map(count_expression).sum::<usize>(),
        Expression::MemberExpression {
            object, property, ..
        } => 1 + count_expression(object) + count_expression(property),
        Expression::ArrayExpression { elements, .. } => {
            1 + elements
                .iter()
                .flatten()
                .map(count_expression)
                .sum::<usize>()
        }
        Expression::ObjectExpression { properties, .. } => {
            1 + properties
                .iter()
                .map(|p| count_expression(&p.value))
                .sum::<usize>()
        }
    }
}
