//! Recursive descent parser for AulaScript
//!
//! The parser consumes the lexer's token stream (comments filtered) and
//! produces a [`Program`] plus the list of syntax errors. It never aborts:
//! structural errors unwind to the nearest statement boundary, where
//! panic-mode recovery (`synchronize`) skips to a safe resumption point.

use crate::ast::*;
use crate::error::{missing_token, syntax_error, unexpected_eof, unexpected_token};
use crate::lexer::{Token, TokenKind};
use core_types::{Diagnostic, SourcePosition};

/// Keywords that may start a statement; `synchronize` stops in front of them.
const STATEMENT_KEYWORDS: [&str; 8] = [
    "function", "var", "let", "const", "if", "while", "for", "return",
];

/// Marker for an already-recorded syntax error unwinding to a statement
/// boundary.
struct Abort;

type ParseResult<T> = Result<T, Abort>;

/// Recursive descent parser over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    errors: Vec<Diagnostic>,
}

impl Parser {
    /// Create a parser for the given token stream.
    ///
    /// Comment tokens do not participate in parsing and are filtered here.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        if tokens.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                line: 1,
                column: 1,
                start: 0,
                end: 0,
            });
        }
        Self {
            tokens,
            position: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the token stream into a program.
    ///
    /// Always returns a [`Program`]; errors are collected in source order
    /// in the returned diagnostic list.
    pub fn parse(mut self) -> (Program, Vec<Diagnostic>) {
        let mut body = Vec::new();

        while !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(Abort) => self.synchronize(),
            }
        }

        (Program { body }, self.errors)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        if self.check_keyword("function") {
            return self.parse_function_declaration();
        }
        if self.check_keyword("var") || self.check_keyword("let") || self.check_keyword("const") {
            return self.parse_variable_declaration();
        }
        if self.check_keyword("if") {
            return self.parse_if_statement();
        }
        if self.check_keyword("while") {
            return self.parse_while_statement();
        }
        if self.check_keyword("for") {
            return self.parse_for_statement();
        }
        if self.check_keyword("return") {
            return self.parse_return_statement();
        }
        if self.check_punctuator("{") {
            let (body, position) = self.parse_block_body()?;
            return Ok(Statement::BlockStatement { body, position });
        }
        self.parse_expression_statement()
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<Statement> {
        let (kind, declarations, position) = self.parse_variable_declaration_parts()?;
        self.expect_semicolon();
        Ok(Statement::VariableDeclaration {
            kind,
            declarations,
            position,
        })
    }

    /// Shared by statement position and `for` headers; does not consume the
    /// terminating semicolon.
    fn parse_variable_declaration_parts(
        &mut self,
    ) -> ParseResult<(VariableKind, Vec<VariableDeclarator>, SourcePosition)> {
        let keyword = self.advance();
        let position = keyword.position();
        let kind = match keyword.lexeme.as_str() {
            "var" => VariableKind::Var,
            "let" => VariableKind::Let,
            _ => VariableKind::Const,
        };

        let mut declarations = Vec::new();
        loop {
            let id = self.expect_identifier()?;
            let init = if self.match_operator("=") {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            declarations.push(VariableDeclarator { id, init });

            if !self.match_punctuator(",") {
                break;
            }
        }

        Ok((kind, declarations, position))
    }

    fn parse_function_declaration(&mut self) -> ParseResult<Statement> {
        let position = self.advance().position(); // 'function'
        let id = self.expect_identifier()?;

        self.expect_punctuator("(")?;
        let mut params = Vec::new();
        if !self.check_punctuator(")") {
            loop {
                params.push(self.expect_identifier()?);
                if !self.match_punctuator(",") {
                    break;
                }
            }
        }
        self.expect_punctuator(")")?;

        let (body, _) = self.parse_block_body()?;
        Ok(Statement::FunctionDeclaration {
            id,
            params,
            body,
            position,
        })
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        let position = self.advance().position(); // 'if'
        self.expect_punctuator("(")?;
        let test = self.parse_expression()?;
        self.expect_punctuator(")")?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.match_keyword("else") {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::IfStatement {
            test,
            consequent,
            alternate,
            position,
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        let position = self.advance().position(); // 'while'
        self.expect_punctuator("(")?;
        let test = self.parse_expression()?;
        self.expect_punctuator(")")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::WhileStatement {
            test,
            body,
            position,
        })
    }

    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        let position = self.advance().position(); // 'for'
        self.expect_punctuator("(")?;

        let init = if self.match_punctuator(";") {
            None
        } else if self.check_keyword("var")
            || self.check_keyword("let")
            || self.check_keyword("const")
        {
            let (kind, declarations, decl_pos) = self.parse_variable_declaration_parts()?;
            self.expect_semicolon();
            Some(ForInit::VariableDeclaration {
                kind,
                declarations,
                position: decl_pos,
            })
        } else {
            let expression = self.parse_expression()?;
            self.expect_semicolon();
            Some(ForInit::Expression(expression))
        };

        let test = if self.check_punctuator(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon();

        let update = if self.check_punctuator(")") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punctuator(")")?;

        let body = Box::new(self.parse_statement()?);
        Ok(Statement::ForStatement {
            init,
            test,
            update,
            body,
            position,
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let position = self.advance().position(); // 'return'
        let argument = if self.check_punctuator(";") || self.is_at_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon();
        Ok(Statement::ReturnStatement { argument, position })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let expression = self.parse_expression()?;
        let position = expression.position();
        self.expect_semicolon();
        Ok(Statement::ExpressionStatement {
            expression,
            position,
        })
    }

    /// Parse `{ statements }`, recovering inside the block so one bad
    /// statement does not discard its well-formed siblings.
    fn parse_block_body(&mut self) -> ParseResult<(Vec<Statement>, SourcePosition)> {
        let open = self.expect_punctuator("{")?;
        let position = open.position();

        let mut body = Vec::new();
        while !self.check_punctuator("}") && !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(Abort) => self.synchronize(),
            }
        }

        self.expect_punctuator("}")?;
        Ok((body, position))
    }

    // =========================================================================
    // Expressions, lowest to highest precedence
    // =========================================================================

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> ParseResult<Expression> {
        let left = self.parse_conditional_expression()?;

        let operator = if self.check_operator("=") {
            Some(AssignmentOperator::Assign)
        } else if self.check_operator("+=") {
            Some(AssignmentOperator::AddAssign)
        } else if self.check_operator("-=") {
            Some(AssignmentOperator::SubAssign)
        } else if self.check_operator("*=") {
            Some(AssignmentOperator::MulAssign)
        } else if self.check_operator("/=") {
            Some(AssignmentOperator::DivAssign)
        } else if self.check_operator("%=") {
            Some(AssignmentOperator::ModAssign)
        } else {
            None
        };

        if let Some(operator) = operator {
            self.advance();
            // Right-associative
            let right = Box::new(self.parse_assignment_expression()?);
            let position = left.position();
            return Ok(Expression::AssignmentExpression {
                operator,
                left: Box::new(left),
                right,
                position,
            });
        }

        Ok(left)
    }

    fn parse_conditional_expression(&mut self) -> ParseResult<Expression> {
        let test = self.parse_logical_expression()?;

        if self.match_operator("?") {
            let consequent = Box::new(self.parse_assignment_expression()?);
            self.expect_operator(":")?;
            let alternate = Box::new(self.parse_assignment_expression()?);
            let position = test.position();
            return Ok(Expression::ConditionalExpression {
                test: Box::new(test),
                consequent,
                alternate,
                position,
            });
        }

        Ok(test)
    }

    fn parse_logical_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_equality_expression()?;

        loop {
            let operator = if self.check_operator("&&") {
                LogicalOperator::And
            } else if self.check_operator("||") {
                LogicalOperator::Or
            } else {
                break;
            };
            self.advance();
            let right = self.parse_equality_expression()?;
            let position = left.position();
            left = Expression::LogicalExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }

        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_relational_expression()?;

        loop {
            let operator = if self.check_operator("==") {
                BinaryOperator::Eq
            } else if self.check_operator("===") {
                BinaryOperator::StrictEq
            } else if self.check_operator("!=") {
                BinaryOperator::NotEq
            } else if self.check_operator("!==") {
                BinaryOperator::StrictNotEq
            } else {
                break;
            };
            self.advance();
            let right = self.parse_relational_expression()?;
            let position = left.position();
            left = Expression::BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }

        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_additive_expression()?;

        loop {
            let operator = if self.check_operator("<") {
                BinaryOperator::Lt
            } else if self.check_operator(">") {
                BinaryOperator::Gt
            } else if self.check_operator("<=") {
                BinaryOperator::LtEq
            } else if self.check_operator(">=") {
                BinaryOperator::GtEq
            } else if self.check_keyword("in") {
                BinaryOperator::In
            } else if self.check_keyword("instanceof") {
                BinaryOperator::Instanceof
            } else {
                break;
            };
            self.advance();
            let right = self.parse_additive_expression()?;
            let position = left.position();
            left = Expression::BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }

        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let operator = if self.check_operator("+") {
                BinaryOperator::Add
            } else if self.check_operator("-") {
                BinaryOperator::Sub
            } else {
                break;
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            let position = left.position();
            left = Expression::BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }

        Ok(left)
    }

    /// `**` is parsed at this level in the dialect, left-associative like
    /// the other multiplicative operators.
    fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let operator = if self.check_operator("*") {
                BinaryOperator::Mul
            } else if self.check_operator("/") {
                BinaryOperator::Div
            } else if self.check_operator("%") {
                BinaryOperator::Mod
            } else if self.check_operator("**") {
                BinaryOperator::Exp
            } else {
                break;
            };
            self.advance();
            let right = self.parse_unary_expression()?;
            let position = left.position();
            left = Expression::BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let operator = if self.check_operator("!") {
            Some(UnaryOperator::Not)
        } else if self.check_operator("-") {
            Some(UnaryOperator::Minus)
        } else if self.check_operator("+") {
            Some(UnaryOperator::Plus)
        } else if self.check_keyword("typeof") {
            Some(UnaryOperator::Typeof)
        } else if self.check_keyword("void") {
            Some(UnaryOperator::Void)
        } else if self.check_keyword("delete") {
            Some(UnaryOperator::Delete)
        } else {
            None
        };

        if let Some(operator) = operator {
            let position = self.advance().position();
            let argument = Box::new(self.parse_unary_expression()?);
            return Ok(Expression::UnaryExpression {
                operator,
                argument,
                prefix: true,
                position,
            });
        }

        if self.check_operator("++") || self.check_operator("--") {
            let token = self.advance();
            let operator = if token.lexeme == "++" {
                UpdateOperator::Increment
            } else {
                UpdateOperator::Decrement
            };
            let argument = Box::new(self.parse_unary_expression()?);
            return Ok(Expression::UpdateExpression {
                operator,
                argument,
                prefix: true,
                position: token.position(),
            });
        }

        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_call_member_expression()?;

        while self.check_operator("++") || self.check_operator("--") {
            let token = self.advance();
            let operator = if token.lexeme == "++" {
                UpdateOperator::Increment
            } else {
                UpdateOperator::Decrement
            };
            let position = expr.position();
            expr = Expression::UpdateExpression {
                operator,
                argument: Box::new(expr),
                prefix: false,
                position,
            };
        }

        Ok(expr)
    }

    /// Left-associative call and member suffixes: `(args)`, `.id`, `[expr]`.
    fn parse_call_member_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            if self.match_punctuator("(") {
                let mut arguments = Vec::new();
                if !self.check_punctuator(")") {
                    loop {
                        arguments.push(self.parse_assignment_expression()?);
                        if !self.match_punctuator(",") {
                            break;
                        }
                    }
                }
                self.expect_punctuator(")")?;
                let position = expr.position();
                expr = Expression::CallExpression {
                    callee: Box::new(expr),
                    arguments,
                    position,
                };
            } else if self.match_punctuator(".") {
                let name = self.expect_identifier()?;
                let position = expr.position();
                expr = Expression::MemberExpression {
                    object: Box::new(expr),
                    property: Box::new(Expression::Identifier {
                        name: name.name,
                        position: name.position,
                    }),
                    computed: false,
                    position,
                };
            } else if self.match_punctuator("[") {
                let property = self.parse_expression()?;
                self.expect_punctuator("]")?;
                let position = expr.position();
                expr = Expression::MemberExpression {
                    object: Box::new(expr),
                    property: Box::new(property),
                    computed: true,
                    position,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let token = self.peek().clone();
        let position = token.position();

        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                Ok(Expression::Identifier {
                    name: token.lexeme,
                    position,
                })
            }
            TokenKind::Number => {
                self.advance();
                Ok(Expression::Literal {
                    value: LiteralValue::Number(parse_number_lexeme(&token.lexeme)),
                    raw: token.lexeme,
                    position,
                })
            }
            TokenKind::String => {
                self.advance();
                let body = token.lexeme[1..token.lexeme.len() - 1].to_string();
                Ok(Expression::Literal {
                    value: LiteralValue::String(body),
                    raw: token.lexeme,
                    position,
                })
            }
            TokenKind::Template => {
                self.advance();
                Ok(Expression::TemplateLiteral {
                    raw: token.lexeme,
                    position,
                })
            }
            TokenKind::Keyword if token.lexeme == "true" || token.lexeme == "false" => {
                self.advance();
                Ok(Expression::Literal {
                    value: LiteralValue::Boolean(token.lexeme == "true"),
                    raw: token.lexeme,
                    position,
                })
            }
            TokenKind::Keyword if token.lexeme == "null" => {
                self.advance();
                Ok(Expression::Literal {
                    value: LiteralValue::Null,
                    raw: token.lexeme,
                    position,
                })
            }
            TokenKind::Punctuator if token.lexeme == "(" => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_punctuator(")")?;
                Ok(expr)
            }
            TokenKind::Punctuator if token.lexeme == "[" => self.parse_array_expression(),
            TokenKind::Punctuator if token.lexeme == "{" => self.parse_object_expression(),
            TokenKind::Eof => {
                self.errors.push(unexpected_eof(position));
                Err(Abort)
            }
            _ => {
                // Progress is guaranteed by the advance in synchronize()
                self.errors.push(unexpected_token(&token.lexeme, position));
                Err(Abort)
            }
        }
    }

    fn parse_array_expression(&mut self) -> ParseResult<Expression> {
        let position = self.advance().position(); // '['
        let mut elements = Vec::new();

        while !self.check_punctuator("]") && !self.is_at_end() {
            if self.match_punctuator(",") {
                // A comma with no preceding value yields a hole
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_assignment_expression()?));
            if !self.match_punctuator(",") {
                break;
            }
        }

        self.expect_punctuator("]")?;
        Ok(Expression::ArrayExpression { elements, position })
    }

    fn parse_object_expression(&mut self) -> ParseResult<Expression> {
        let position = self.advance().position(); // '{'
        let mut properties = Vec::new();

        while !self.check_punctuator("}") && !self.is_at_end() {
            let key_token = self.peek().clone();
            let key = match key_token.kind {
                TokenKind::Identifier => PropertyKey::Identifier(key_token.lexeme.clone()),
                TokenKind::String => PropertyKey::String(
                    key_token.lexeme[1..key_token.lexeme.len() - 1].to_string(),
                ),
                TokenKind::Number => {
                    PropertyKey::Number(parse_number_lexeme(&key_token.lexeme))
                }
                _ => {
                    self.errors
                        .push(unexpected_token(&key_token.lexeme, key_token.position()));
                    return Err(Abort);
                }
            };
            self.advance();
            self.expect_operator(":")?;
            let value = self.parse_assignment_expression()?;
            properties.push(ObjectProperty {
                key,
                value,
                position: key_token.position(),
            });

            if !self.match_punctuator(",") {
                break;
            }
        }

        self.expect_punctuator("}")?;
        Ok(Expression::ObjectExpression {
            properties,
            position,
        })
    }

    // =========================================================================
    // Panic-mode recovery
    // =========================================================================

    /// Skip to the next statement boundary after a syntax error.
    ///
    /// Advances one token unconditionally (forward progress), then consumes
    /// tokens until a `;` is skipped, the next token starts a statement, or
    /// EOF is reached.
    fn synchronize(&mut self) {
        if !self.is_at_end() {
            self.advance();
        }

        while !self.is_at_end() {
            if self.check_punctuator(";") {
                self.advance();
                return;
            }
            let token = self.peek();
            if token.kind == TokenKind::Keyword
                && STATEMENT_KEYWORDS.contains(&token.lexeme.as_str())
            {
                return;
            }
            self.advance();
        }
    }

    // =========================================================================
    // Token cursor helpers
    // =========================================================================

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn check_punctuator(&self, lexeme: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Punctuator && token.lexeme == lexeme
    }

    fn check_operator(&self, lexeme: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Operator && token.lexeme == lexeme
    }

    fn check_keyword(&self, lexeme: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Keyword && token.lexeme == lexeme
    }

    fn match_punctuator(&mut self, lexeme: &str) -> bool {
        if self.check_punctuator(lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_operator(&mut self, lexeme: &str) -> bool {
        if self.check_operator(lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, lexeme: &str) -> bool {
        if self.check_keyword(lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punctuator(&mut self, lexeme: &str) -> ParseResult<Token> {
        if self.check_punctuator(lexeme) {
            Ok(self.advance())
        } else {
            let token = self.peek().clone();
            self.errors
                .push(missing_token(lexeme, &token.lexeme, token.position()));
            Err(Abort)
        }
    }

    fn expect_operator(&mut self, lexeme: &str) -> ParseResult<Token> {
        if self.check_operator(lexeme) {
            Ok(self.advance())
        } else {
            let token = self.peek().clone();
            self.errors
                .push(missing_token(lexeme, &token.lexeme, token.position()));
            Err(Abort)
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<Ident> {
        let token = self.peek().clone();
        if token.kind == TokenKind::Identifier {
            self.advance();
            Ok(Ident {
                position: token.position(),
                name: token.lexeme,
            })
        } else {
            self.errors.push(syntax_error(
                format!("Expected identifier, got '{}'", token.lexeme),
                token.position(),
            ));
            Err(Abort)
        }
    }

    /// A missing semicolon is recorded but never aborts parsing.
    fn expect_semicolon(&mut self) {
        if self.check_punctuator(";") {
            self.advance();
        } else {
            let token = self.peek().clone();
            self.errors
                .push(missing_token(";", &token.lexeme, token.position()));
        }
    }
}

fn parse_number_lexeme(lexeme: &str) -> f64 {
    let lower = lexeme.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return u64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return u64::from_str_radix(bin, 2).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    lexeme.parse::<f64>().unwrap_or(f64::NAN)
}
