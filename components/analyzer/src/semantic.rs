//! Scope-aware semantic analysis of AulaScript programs
//!
//! The analyzer walks the AST read-only, maintains the scope tree, hoists
//! function declarations, checks usage/initialization/redeclaration and
//! const immutability, and emits the style heuristics. It records every
//! diagnostic and continues; nothing aborts the walk.

use crate::scope::{ScopeKind, ScopeTree, SymbolInfo, SymbolKind, ValueClass};
use core_types::{Diagnostic, SourcePosition};
use parser::ast::{
    AssignmentOperator, BinaryOperator, Expression, ForInit, LiteralValue, Program, Statement,
    UnaryOperator, VariableDeclarator, VariableKind,
};

/// Console methods that do not trigger the unknown-method warning.
const KNOWN_CONSOLE_METHODS: [&str; 5] = ["log", "warn", "error", "info", "debug"];

/// Output of a semantic analysis run.
#[derive(Debug)]
pub struct AnalysisResult {
    /// The scope tree with the final symbol flags
    pub scopes: ScopeTree,
    /// Semantic errors in source order
    pub errors: Vec<Diagnostic>,
    /// Warnings in source order
    pub warnings: Vec<Diagnostic>,
}

/// Per-function state while its body is being analyzed.
struct FunctionFrame {
    name: String,
    has_return: bool,
    position: SourcePosition,
}

/// Semantic analyzer over a parsed program.
///
/// Each analysis is a fresh instance with its own scope tree and
/// diagnostic buffers; there is no shared state between runs.
pub struct SemanticAnalyzer {
    scopes: ScopeTree,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    function_stack: Vec<FunctionFrame>,
}

impl SemanticAnalyzer {
    /// Create an analyzer with a fresh global scope.
    pub fn new() -> Self {
        Self {
            scopes: ScopeTree::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            function_stack: Vec::new(),
        }
    }

    /// Analyze a program and return the scope tree and diagnostics.
    pub fn analyze(mut self, program: &Program) -> AnalysisResult {
        self.hoist_functions(&program.body);
        for stmt in &program.body {
            self.visit_statement(stmt);
        }
        self.check_unused();

        AnalysisResult {
            scopes: self.scopes,
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Pre-install every function declaration among the immediate
    /// statements of a global or function scope, before the regular walk.
    fn hoist_functions(&mut self, statements: &[Statement]) {
        for stmt in statements {
            if let Statement::FunctionDeclaration { id, params, .. } = stmt {
                if self.scopes.declared_in_current(&id.name).is_some() {
                    self.error(
                        format!("Variable '{}' is already declared in this scope", id.name),
                        id.position,
                        "FunctionDeclaration",
                    );
                    continue;
                }
                let mut symbol = SymbolInfo::new(&id.name, SymbolKind::Function, id.position);
                symbol.initialized = true;
                symbol.hoisted = true;
                symbol.params = Some(params.iter().map(|p| p.name.clone()).collect());
                self.scopes.declare(symbol);
            }
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VariableDeclaration {
                kind, declarations, ..
            } => {
                for decl in declarations {
                    self.declare_variable(decl, *kind);
                }
            }

            Statement::FunctionDeclaration {
                id,
                params,
                body,
                position,
            } => {
                let already_hoisted = matches!(
                    self.scopes.declared_in_current(&id.name),
                    Some(s) if s.kind == SymbolKind::Function && s.hoisted
                );
                if !already_hoisted {
                    // Nested declarations inside blocks follow the regular
                    // statement walk; block-scoped hoisting is not modelled
                    if let Some(existing) = self.scopes.declared_in_current(&id.name) {
                        let message = if existing.kind != SymbolKind::Function {
                            format!(
                                "Identifier '{}' has already been declared with different kind",
                                id.name
                            )
                        } else {
                            format!("Variable '{}' is already declared in this scope", id.name)
                        };
                        self.error(message, id.position, "FunctionDeclaration");
                    } else {
                        let mut symbol =
                            SymbolInfo::new(&id.name, SymbolKind::Function, id.position);
                        symbol.initialized = true;
                        symbol.params = Some(params.iter().map(|p| p.name.clone()).collect());
                        self.scopes.declare(symbol);
                    }
                }

                self.function_stack.push(FunctionFrame {
                    name: id.name.clone(),
                    has_return: false,
                    position: *position,
                });
                self.scopes.enter_scope(ScopeKind::Function);

                for param in params {
                    if self.scopes.declared_in_current(&param.name).is_some() {
                        self.error(
                            format!(
                                "Variable '{}' is already declared in this scope",
                                param.name
                            ),
                            param.position,
                            "FunctionDeclaration",
                        );
                    } else {
                        let mut symbol =
                            SymbolInfo::new(&param.name, SymbolKind::Parameter, param.position);
                        symbol.initialized = true;
                        self.scopes.declare(symbol);
                    }
                }

                self.hoist_functions(body);
                for stmt in body {
                    self.visit_statement(stmt);
                }

                self.scopes.exit_scope();
                if let Some(frame) = self.function_stack.pop() {
                    if !frame.has_return && frame.name != "main" {
                        self.warning(
                            format!("Function '{}' does not have a return statement", frame.name),
                            frame.position,
                            "FunctionDeclaration",
                        );
                    }
                }
            }

            Statement::BlockStatement { body, .. } => {
                self.scopes.enter_scope(ScopeKind::Block);
                for stmt in body {
                    self.visit_statement(stmt);
                }
                self.scopes.exit_scope();
            }

            Statement::ExpressionStatement { expression, .. } => {
                self.visit_expression(expression);
            }

            Statement::IfStatement {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.visit_expression(test);
                if is_always_truthy(test) {
                    self.warning(
                        "Condition is always truthy".to_string(),
                        test.position(),
                        "IfStatement",
                    );
                } else if is_always_falsy(test) {
                    self.warning(
                        "Condition is always falsy".to_string(),
                        test.position(),
                        "IfStatement",
                    );
                }
                self.visit_statement(consequent);
                if let Some(alt) = alternate {
                    self.visit_statement(alt);
                }
            }

            Statement::WhileStatement { test, body, .. } => {
                self.visit_expression(test);
                if is_always_truthy(test) {
                    self.warning(
                        "Potential infinite loop: condition is always truthy".to_string(),
                        test.position(),
                        "WhileStatement",
                    );
                } else if is_always_falsy(test) {
                    self.warning(
                        "Condition is always falsy".to_string(),
                        test.position(),
                        "WhileStatement",
                    );
                }
                self.visit_statement(body);
            }

            Statement::ForStatement {
                init,
                test,
                update,
                body,
                ..
            } => {
                // Declarations in the header are scoped to the loop
                self.scopes.enter_scope(ScopeKind::Block);
                match init {
                    Some(ForInit::VariableDeclaration {
                        kind, declarations, ..
                    }) => {
                        for decl in declarations {
                            self.declare_variable(decl, *kind);
                        }
                    }
                    Some(ForInit::Expression(expr)) => self.visit_expression(expr),
                    None => {}
                }
                if let Some(test) = test {
                    self.visit_expression(test);
                }
                if let Some(update) = update {
                    self.visit_expression(update);
                }
                self.visit_statement(body);
                self.scopes.exit_scope();
            }

            Statement::ReturnStatement {
                argument, position, ..
            } => {
                if let Some(frame) = self.function_stack.last_mut() {
                    frame.has_return = true;
                } else {
                    self.error(
                        "Return statement outside of function".to_string(),
                        *position,
                        "ReturnStatement",
                    );
                }
                if let Some(arg) = argument {
                    self.visit_expression(arg);
                }
            }
        }
    }

    fn declare_variable(&mut self, decl: &VariableDeclarator, kind: VariableKind) {
        let symbol_kind = match kind {
            VariableKind::Const => SymbolKind::Const,
            VariableKind::Var | VariableKind::Let => SymbolKind::Variable,
        };

        if kind == VariableKind::Const && decl.init.is_none() {
            self.error(
                format!("Missing initializer in const declaration '{}'", decl.id.name),
                decl.id.position,
                "VariableDeclaration",
            );
        }

        if let Some(existing) = self.scopes.declared_in_current(&decl.id.name) {
            let message = if existing.kind != symbol_kind {
                format!(
                    "Identifier '{}' has already been declared with different kind",
                    decl.id.name
                )
            } else {
                format!(
                    "Variable '{}' is already declared in this scope",
                    decl.id.name
                )
            };
            self.error(message, decl.id.position, "VariableDeclaration");
            if let Some(init) = &decl.init {
                self.visit_expression(init);
            }
            return;
        }

        if let Some(init) = &decl.init {
            self.visit_expression(init);
        }

        let mut symbol = SymbolInfo::new(&decl.id.name, symbol_kind, decl.id.position);
        symbol.initialized = decl.init.is_some();
        symbol.value_class = decl.init.as_ref().and_then(literal_class);
        self.scopes.declare(symbol);
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn visit_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Identifier { name, position } => {
                self.mark_identifier_use(name, *position);
            }

            Expression::Literal { .. } | Expression::TemplateLiteral { .. } => {}

            Expression::AssignmentExpression {
                operator,
                left,
                right,
                position,
            } => {
                // Right side first
                self.visit_expression(right);

                match left.as_ref() {
                    Expression::Identifier { name, position } => {
                        self.assign_identifier(name, *position);
                    }
                    // Member targets are analyzed recursively, without
                    // scope effects
                    other => self.visit_expression(other),
                }

                match operator {
                    AssignmentOperator::AddAssign => {
                        self.check_addition(left, right, *position, "AssignmentExpression");
                    }
                    AssignmentOperator::SubAssign
                    | AssignmentOperator::MulAssign
                    | AssignmentOperator::DivAssign
                    | AssignmentOperator::ModAssign => {
                        self.check_numeric_operation(
                            &operator.to_string(),
                            left,
                            right,
                            *position,
                            "AssignmentExpression",
                        );
                    }
                    AssignmentOperator::Assign => {}
                }
            }

            Expression::ConditionalExpression {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.visit_expression(test);
                if is_always_truthy(test) {
                    self.warning(
                        "Condition is always truthy".to_string(),
                        test.position(),
                        "ConditionalExpression",
                    );
                } else if is_always_falsy(test) {
                    self.warning(
                        "Condition is always falsy".to_string(),
                        test.position(),
                        "ConditionalExpression",
                    );
                }
                self.visit_expression(consequent);
                self.visit_expression(alternate);
            }

            Expression::LogicalExpression { left, right, .. } => {
                self.visit_expression(left);
                self.visit_expression(right);
            }

            Expression::BinaryExpression {
                operator,
                left,
                right,
                position,
            } => {
                self.visit_expression(left);
                self.visit_expression(right);

                match operator {
                    BinaryOperator::Eq => {
                        self.warning(
                            "Use '===' for strict comparison".to_string(),
                            *position,
                            "BinaryExpression",
                        );
                    }
                    BinaryOperator::NotEq => {
                        self.warning(
                            "Use '!==' for strict comparison".to_string(),
                            *position,
                            "BinaryExpression",
                        );
                    }
                    BinaryOperator::Add => {
                        self.check_addition(left, right, *position, "BinaryExpression");
                    }
                    op if op.is_numeric() => {
                        self.check_numeric_operation(
                            &op.to_string(),
                            left,
                            right,
                            *position,
                            "BinaryExpression",
                        );
                    }
                    op if op.is_relational() => {
                        self.check_comparison(left, right, *position);
                    }
                    _ => {}
                }
            }

            Expression::UnaryExpression {
                operator, argument, ..
            } => {
                if *operator == UnaryOperator::Not {
                    if let Expression::UnaryExpression {
                        operator: UnaryOperator::Not,
                        ..
                    } = argument.as_ref()
                    {
                        self.warning(
                            "Double negation '!!' can be simplified".to_string(),
                            expr.position(),
                            "UnaryExpression",
                        );
                    }
                }
                if *operator == UnaryOperator::Delete {
                    if let Expression::Identifier { name, .. } = argument.as_ref() {
                        self.warning(
                            format!("Delete of unqualified identifier '{}' in strict mode", name),
                            expr.position(),
                            "UnaryExpression",
                        );
                    }
                }
                self.visit_expression(argument);
            }

            Expression::UpdateExpression { argument, .. } => match argument.as_ref() {
                Expression::Identifier { name, position } => {
                    self.update_identifier(name, *position);
                }
                other => self.visit_expression(other),
            },

            Expression::CallExpression {
                callee, arguments, ..
            } => {
                match callee.as_ref() {
                    Expression::Identifier { name, position } => {
                        self.call_identifier(name, *position, arguments.len());
                    }
                    other => self.visit_expression(other),
                }
                for arg in arguments {
                    self.visit_expression(arg);
                }
            }

            Expression::MemberExpression {
                object,
                property,
                computed,
                ..
            } => {
                if !computed {
                    if let (
                        Expression::Identifier { name: object_name, .. },
                        Expression::Identifier {
                            name: method,
                            position,
                        },
                    ) = (object.as_ref(), property.as_ref())
                    {
                        if object_name == "console"
                            && !KNOWN_CONSOLE_METHODS.contains(&method.as_str())
                        {
                            self.warning(
                                format!("Unknown console method: {}", method),
                                *position,
                                "MemberExpression",
                            );
                        }
                    }
                }
                self.visit_expression(object);
                // A non-computed property name is not a variable reference
                if *computed {
                    self.visit_expression(property);
                }
            }

            Expression::ArrayExpression { elements, .. } => {
                for element in elements.iter().flatten() {
                    self.visit_expression(element);
                }
            }

            Expression::ObjectExpression { properties, .. } => {
                let mut seen: Vec<String> = Vec::new();
                for prop in properties {
                    let key = prop.key.text();
                    if seen.contains(&key) {
                        self.warning(
                            format!("Duplicate key '{}' in object literal", key),
                            prop.position,
                            "ObjectExpression",
                        );
                    } else {
                        seen.push(key);
                    }
                    self.visit_expression(&prop.value);
                }
            }
        }
    }

    /// The identifier-reference path: resolve, mark used, and flag
    /// use-before-initialization.
    fn mark_identifier_use(&mut self, name: &str, position: SourcePosition) {
        let resolution = match self.scopes.resolve_mut(name) {
            Some(symbol) => {
                symbol.used = true;
                Some(!symbol.initialized && symbol.kind != SymbolKind::Function && !symbol.builtin)
            }
            None => None,
        };

        match resolution {
            None => self.error(
                format!("'{}' is not defined", name),
                position,
                "Identifier",
            ),
            Some(true) => self.error(
                format!("Variable '{}' is used before being initialized", name),
                position,
                "Identifier",
            ),
            Some(false) => {}
        }
    }

    /// Assignment targets resolve directly, so an uninitialized left side
    /// raises no use-before-initialization error.
    fn assign_identifier(&mut self, name: &str, position: SourcePosition) {
        enum Outcome {
            Undeclared,
            ConstTarget,
            Ok,
        }

        let outcome = match self.scopes.resolve_mut(name) {
            None => Outcome::Undeclared,
            Some(symbol) => {
                if symbol.kind == SymbolKind::Const && symbol.initialized {
                    Outcome::ConstTarget
                } else {
                    symbol.initialized = true;
                    symbol.used = true;
                    Outcome::Ok
                }
            }
        };

        match outcome {
            Outcome::Undeclared => self.error(
                format!("Cannot assign to undeclared variable '{}'", name),
                position,
                "AssignmentExpression",
            ),
            Outcome::ConstTarget => self.error(
                format!("Cannot assign to const variable '{}'", name),
                position,
                "AssignmentExpression",
            ),
            Outcome::Ok => {}
        }
    }

    fn update_identifier(&mut self, name: &str, position: SourcePosition) {
        enum Outcome {
            Undeclared,
            ConstTarget,
            Ok,
        }

        let outcome = match self.scopes.resolve_mut(name) {
            None => Outcome::Undeclared,
            Some(symbol) => {
                if symbol.kind == SymbolKind::Const {
                    Outcome::ConstTarget
                } else {
                    symbol.used = true;
                    Outcome::Ok
                }
            }
        };

        match outcome {
            Outcome::Undeclared => self.error(
                format!("Cannot update undeclared variable '{}'", name),
                position,
                "UpdateExpression",
            ),
            Outcome::ConstTarget => self.error(
                format!("Cannot update const variable '{}'", name),
                position,
                "UpdateExpression",
            ),
            Outcome::Ok => {}
        }
    }

    fn call_identifier(&mut self, name: &str, position: SourcePosition, argument_count: usize) {
        let resolved = match self.scopes.resolve_mut(name) {
            Some(symbol) => {
                symbol.used = true;
                Some((symbol.kind, symbol.builtin, symbol.params.clone()))
            }
            None => None,
        };

        match resolved {
            None => {
                self.error(
                    format!("'{}' is not defined", name),
                    position,
                    "CallExpression",
                );
            }
            Some((kind, builtin, params)) => {
                if kind != SymbolKind::Function && !builtin {
                    self.warning(
                        format!("'{}' is not a function", name),
                        position,
                        "CallExpression",
                    );
                }
                if let Some(params) = params {
                    if params.len() != argument_count {
                        self.warning(
                            format!(
                                "Function '{}' expects {} arguments, got {}",
                                name,
                                params.len(),
                                argument_count
                            ),
                            position,
                            "CallExpression",
                        );
                    }
                }
            }
        }
    }

    // =========================================================================
    // Literal-class heuristics
    // =========================================================================

    /// Class of an expression, from a literal leaf or from the literal
    /// class recorded on a symbol's initializer.
    fn expression_class(&self, expr: &Expression) -> Option<ValueClass> {
        match expr {
            Expression::Literal { .. } => literal_class(expr),
            Expression::Identifier { name, .. } => {
                self.scopes.resolve(name).and_then(|s| s.value_class)
            }
            _ => None,
        }
    }

    fn check_addition(
        &mut self,
        left: &Expression,
        right: &Expression,
        position: SourcePosition,
        node: &str,
    ) {
        let left_class = self.expression_class(left);
        let right_class = self.expression_class(right);
        let mixed = matches!(
            (left_class, right_class),
            (Some(ValueClass::String), Some(ValueClass::Number))
                | (Some(ValueClass::Number), Some(ValueClass::String))
        );
        if mixed {
            self.warning(
                "Adding string and number might produce unexpected results".to_string(),
                position,
                node,
            );
        }
    }

    fn check_numeric_operation(
        &mut self,
        operator: &str,
        left: &Expression,
        right: &Expression,
        position: SourcePosition,
        node: &str,
    ) {
        let has_string = self.expression_class(left) == Some(ValueClass::String)
            || self.expression_class(right) == Some(ValueClass::String);
        if has_string {
            self.warning(
                format!("Numeric operator '{}' applied to a string literal", operator),
                position,
                node,
            );
        }
    }

    fn check_comparison(
        &mut self,
        left: &Expression,
        right: &Expression,
        position: SourcePosition,
    ) {
        if let (Some(left_class), Some(right_class)) =
            (self.expression_class(left), self.expression_class(right))
        {
            if left_class != right_class {
                self.warning(
                    format!(
                        "Comparing {} and {} relies on implicit type coercion",
                        left_class, right_class
                    ),
                    position,
                    "BinaryExpression",
                );
            }
        }
    }

    // =========================================================================
    // Final sweep
    // =========================================================================

    /// Descend the scope tree (creation order) and flag bindings that were
    /// never referenced. Builtins and functions are exempt.
    fn check_unused(&mut self) {
        let mut unused = Vec::new();
        for scope in self.scopes.scopes() {
            for symbol in &scope.symbols {
                if !symbol.used && !symbol.builtin && symbol.kind != SymbolKind::Function {
                    unused.push((symbol.name.clone(), symbol.position()));
                }
            }
        }
        for (name, position) in unused {
            self.warning(
                format!("Variable '{}' is declared but never used", name),
                position,
                "VariableDeclarator",
            );
        }
    }

    fn error(&mut self, message: String, position: SourcePosition, node: &str) {
        self.errors
            .push(Diagnostic::error(message, position).with_node(node));
    }

    fn warning(&mut self, message: String, position: SourcePosition, node: &str) {
        self.warnings
            .push(Diagnostic::warning(message, position).with_node(node));
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Class of a literal expression leaf; `null` reports as "object".
fn literal_class(expr: &Expression) -> Option<ValueClass> {
    match expr {
        Expression::Literal { value, .. } => Some(match value {
            LiteralValue::Number(_) => ValueClass::Number,
            LiteralValue::String(_) => ValueClass::String,
            LiteralValue::Boolean(_) => ValueClass::Boolean,
            LiteralValue::Null => ValueClass::Object,
        }),
        _ => None,
    }
}

/// A test that can be decided truthy from the literal alone.
fn is_always_truthy(expr: &Expression) -> bool {
    match expr {
        Expression::Literal { value, .. } => match value {
            LiteralValue::Boolean(b) => *b,
            LiteralValue::Number(n) => *n != 0.0 && !n.is_nan(),
            LiteralValue::String(s) => !s.is_empty(),
            LiteralValue::Null => false,
        },
        Expression::Identifier { name, .. } => name == "true",
        _ => false,
    }
}

/// A test that can be decided falsy from the literal alone.
fn is_always_falsy(expr: &Expression) -> bool {
    match expr {
        Expression::Literal { value, .. } => match value {
            LiteralValue::Boolean(b) => !*b,
            LiteralValue::Number(n) => *n == 0.0 || n.is_nan(),
            LiteralValue::String(s) => s.is_empty(),
            LiteralValue::Null => true,
        },
        Expression::Identifier { name, .. } => {
            name == "false" || name == "undefined" || name == "null"
        }
        _ => false,
    }
}
