//! AulaScript lexer - tokenizes source code into positioned tokens

use core_types::{Diagnostic, SourcePosition};
use serde::Serialize;
use std::fmt;

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Reserved word
    Keyword,
    /// Identifier (variable name, etc.)
    Identifier,
    /// Numeric literal
    Number,
    /// String literal (quotes retained in the lexeme)
    String,
    /// Template literal (backticks retained in the lexeme)
    Template,
    /// Operator from the operator set
    Operator,
    /// Punctuator such as braces, parentheses or semicolons
    Punctuator,
    /// Line or block comment
    Comment,
    /// End of file marker
    Eof,
    /// Unrecognized character
    Invalid,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Template => "template",
            TokenKind::Operator => "operator",
            TokenKind::Punctuator => "punctuator",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "eof",
            TokenKind::Invalid => "invalid",
        };
        write!(f, "{}", name)
    }
}

/// Token produced by the lexer.
///
/// Tokens are immutable after emission; positions are 1-based and
/// `start`/`end` are byte offsets into the source string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,
    /// Exact characters of the token; strings and templates retain their
    /// surrounding quotes
    pub lexeme: String,
    /// Line of the first character (1-based)
    pub line: u32,
    /// Column of the first character (1-based)
    pub column: u32,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token {
    /// Position of the first character of this token.
    pub fn position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.start,
        }
    }
}

/// Check whether an identifier lexeme is a reserved word.
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "abstract"
            | "await"
            | "boolean"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "final"
            | "finally"
            | "float"
            | "for"
            | "function"
            | "goto"
            | "if"
            | "implements"
            | "import"
            | "in"
            | "instanceof"
            | "int"
            | "interface"
            | "let"
            | "long"
            | "native"
            | "new"
            | "null"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "short"
            | "static"
            | "super"
            | "switch"
            | "synchronized"
            | "this"
            | "throw"
            | "throws"
            | "transient"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "volatile"
            | "while"
            | "with"
            | "yield"
            | "async"
            | "of"
    )
}

/// Three-character operators, tried first.
const OPERATORS_3: [&str; 4] = ["===", "!==", ">>>", "**="];

/// Two-character operators, tried after the three-character ones.
const OPERATORS_2: [&str; 17] = [
    "++", "--", "+=", "-=", "*=", "/=", "%=", "==", "!=", ">=", "<=", "&&", "||", "<<", ">>",
    "=>", "**",
];

/// One-character operators.
const OPERATORS_1: [char; 15] = [
    '+', '-', '*', '/', '%', '=', '>', '<', '!', '&', '|', '^', '~', '?', ':',
];

/// One-character punctuators.
const PUNCTUATORS_1: [char; 9] = ['{', '}', '[', ']', '(', ')', ';', ',', '.'];

/// Lexer for AulaScript source code.
///
/// Consumes the source in a single forward pass and produces the complete
/// token stream plus any lexical errors. Whitespace is consumed silently;
/// comments are emitted as tokens. Exactly one [`TokenKind::Eof`] token
/// terminates the stream.
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    offset: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    errors: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source code.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole source.
    ///
    /// Returns the token stream (terminated by exactly one EOF token) and
    /// the list of lexical errors in source order. The lexer never aborts:
    /// on an unrecognized character it records an error, emits an
    /// [`TokenKind::Invalid`] token and advances one codepoint.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }

        let eof_pos = self.current_position();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line: eof_pos.line,
            column: eof_pos.column,
            start: eof_pos.offset,
            end: eof_pos.offset,
        });

        (self.tokens, self.errors)
    }

    fn scan_token(&mut self) {
        let start = self.current_position();
        let ch = self.peek();

        if ch == '/' && (self.peek_next() == Some('/') || self.peek_next() == Some('*')) {
            self.scan_comment(start);
        } else if is_identifier_start(ch) {
            self.scan_identifier(start);
        } else if ch.is_ascii_digit() {
            self.scan_number(start);
        } else if ch == '"' || ch == '\'' {
            self.scan_string(start);
        } else if ch == '`' {
            self.scan_template(start);
        } else if !self.scan_operator_or_punctuator(start) {
            self.errors.push(Diagnostic::error(
                format!("Unexpected character: '{}'", ch),
                start,
            ));
            self.advance();
            self.emit(TokenKind::Invalid, ch.to_string(), start);
        }
    }

    fn scan_identifier(&mut self, start: SourcePosition) {
        let mut lexeme = String::new();
        while !self.is_at_end() && is_identifier_continue(self.peek()) {
            lexeme.push(self.advance());
        }

        let kind = if is_keyword(&lexeme) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.emit(kind, lexeme, start);
    }

    fn scan_number(&mut self, start: SourcePosition) {
        let first = self.advance();
        let mut lexeme = first.to_string();

        // Hex and binary literals: 0x... / 0b...
        if first == '0' && matches!(self.peek_lower(), Some('x')) {
            lexeme.push(self.advance());
            if !self.peek().is_ascii_hexdigit() {
                self.errors
                    .push(Diagnostic::error("Invalid hexadecimal literal", start));
                self.emit(TokenKind::Invalid, lexeme, start);
                return;
            }
            while self.peek().is_ascii_hexdigit() {
                lexeme.push(self.advance());
            }
            self.emit(TokenKind::Number, lexeme, start);
            return;
        }
        if first == '0' && matches!(self.peek_lower(), Some('b')) {
            lexeme.push(self.advance());
            if !matches!(self.peek(), '0' | '1') {
                self.errors
                    .push(Diagnostic::error("Invalid binary literal", start));
                self.emit(TokenKind::Invalid, lexeme, start);
                return;
            }
            while matches!(self.peek(), '0' | '1') {
                lexeme.push(self.advance());
            }
            self.emit(TokenKind::Number, lexeme, start);
            return;
        }

        while self.peek().is_ascii_digit() {
            lexeme.push(self.advance());
        }

        // At most one fractional part
        if self.peek() == '.' {
            lexeme.push(self.advance());
            while self.peek().is_ascii_digit() {
                lexeme.push(self.advance());
            }
        }

        // Scientific suffix: [eE][+-]?digits
        if matches!(self.peek(), 'e' | 'E') {
            let after_e = self.peek_next();
            let after_sign = self.peek_at(2);
            let has_exponent = match after_e {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => matches!(after_sign, Some(d) if d.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                lexeme.push(self.advance());
                if matches!(self.peek(), '+' | '-') {
                    lexeme.push(self.advance());
                }
                while self.peek().is_ascii_digit() {
                    lexeme.push(self.advance());
                }
            }
        }

        self.emit(TokenKind::Number, lexeme, start);
    }

    fn scan_string(&mut self, start: SourcePosition) {
        let quote = self.advance();
        let mut body = String::new();

        while !self.is_at_end() && self.peek() != quote {
            if self.peek() == '\\' {
                self.advance();
                if self.is_at_end() {
                    break;
                }
                let escaped = self.advance();
                match escaped {
                    'n' => body.push('\n'),
                    't' => body.push('\t'),
                    'r' => body.push('\r'),
                    '\\' => body.push('\\'),
                    // Any other escaped character passes through literally,
                    // including the quote itself
                    c => body.push(c),
                }
            } else {
                body.push(self.advance());
            }
        }

        if self.is_at_end() {
            self.errors
                .push(Diagnostic::error("Unterminated string literal", start));
            return;
        }

        self.advance(); // closing quote
        let lexeme = format!("{}{}{}", quote, body, quote);
        self.emit(TokenKind::String, lexeme, start);
    }

    fn scan_template(&mut self, start: SourcePosition) {
        let mut lexeme = self.advance().to_string(); // opening backtick

        while !self.is_at_end() && self.peek() != '`' {
            if self.peek() == '\\' {
                lexeme.push(self.advance());
                if !self.is_at_end() {
                    lexeme.push(self.advance());
                }
            } else if self.peek() == '$' && self.peek_next() == Some('{') {
                // Interpolation: preserved verbatim, scanned with balanced
                // brace counting, never re-lexed
                lexeme.push(self.advance());
                lexeme.push(self.advance());
                let mut depth = 1usize;
                while !self.is_at_end() && depth > 0 {
                    let c = self.advance();
                    match c {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    lexeme.push(c);
                }
            } else {
                lexeme.push(self.advance());
            }
        }

        if self.is_at_end() {
            self.errors
                .push(Diagnostic::error("Unterminated template literal", start));
            return;
        }

        lexeme.push(self.advance()); // closing backtick
        self.emit(TokenKind::Template, lexeme, start);
    }

    fn scan_comment(&mut self, start: SourcePosition) {
        let mut lexeme = String::new();
        lexeme.push(self.advance()); // '/'

        if self.peek() == '/' {
            lexeme.push(self.advance());
            while !self.is_at_end() && self.peek() != '\n' {
                lexeme.push(self.advance());
            }
            self.emit(TokenKind::Comment, lexeme, start);
            return;
        }

        lexeme.push(self.advance()); // '*'
        let mut terminated = false;
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == Some('/') {
                lexeme.push(self.advance());
                lexeme.push(self.advance());
                terminated = true;
                break;
            }
            lexeme.push(self.advance());
        }

        if !terminated {
            // The partial token is still emitted
            self.errors
                .push(Diagnostic::error("Unterminated block comment", start));
        }
        self.emit(TokenKind::Comment, lexeme, start);
    }

    /// Longest-match scan over the operator and punctuator sets: a
    /// three-character match is attempted first, then two, then one.
    fn scan_operator_or_punctuator(&mut self, start: SourcePosition) -> bool {
        if let Some(three) = self.peek_string(3) {
            if OPERATORS_3.contains(&three.as_str()) {
                self.advance_by(3);
                self.emit(TokenKind::Operator, three, start);
                return true;
            }
            if three == "..." {
                self.advance_by(3);
                self.emit(TokenKind::Punctuator, three, start);
                return true;
            }
        }

        if let Some(two) = self.peek_string(2) {
            if OPERATORS_2.contains(&two.as_str()) {
                self.advance_by(2);
                self.emit(TokenKind::Operator, two, start);
                return true;
            }
            if two == "?." {
                self.advance_by(2);
                self.emit(TokenKind::Punctuator, two, start);
                return true;
            }
        }

        let ch = self.peek();
        if OPERATORS_1.contains(&ch) {
            self.advance();
            self.emit(TokenKind::Operator, ch.to_string(), start);
            return true;
        }
        if PUNCTUATORS_1.contains(&ch) {
            self.advance();
            self.emit(TokenKind::Punctuator, ch.to_string(), start);
            return true;
        }

        false
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_whitespace() {
            self.advance();
        }
    }

    fn emit(&mut self, kind: TokenKind, lexeme: String, start: SourcePosition) {
        self.tokens.push(Token {
            kind,
            lexeme,
            line: start.line,
            column: start.column,
            start: start.offset,
            end: self.offset,
        });
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.position]
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.peek_at(1)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.position + n).copied()
    }

    fn peek_lower(&self) -> Option<char> {
        if self.is_at_end() {
            None
        } else {
            Some(self.peek().to_ascii_lowercase())
        }
    }

    fn peek_string(&self, n: usize) -> Option<String> {
        if self.position + n <= self.chars.len() {
            Some(self.chars[self.position..self.position + n].iter().collect())
        } else {
            None
        }
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        Lexer::new(source).tokenize()
    }

    #[test]
    fn test_lexer_empty_source() {
        let (tokens, errors) = lex("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_lexer_identifier() {
        let (tokens, _) = lex("foo");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "foo");
    }

    #[test]
    fn test_lexer_keywords() {
        let (tokens, _) = lex("let const var undefined");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Keyword);
        assert_eq!(tokens[2].kind, TokenKind::Keyword);
        // 'undefined' is not a reserved word in this dialect
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_lexer_number_float() {
        let (tokens, errors) = lex("123.45");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "123.45");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_lexer_number_scientific() {
        let (tokens, _) = lex("1e10 2.5E-3");
        assert_eq!(tokens[0].lexeme, "1e10");
        assert_eq!(tokens[1].lexeme, "2.5E-3");
    }

    #[test]
    fn test_lexer_number_hex_and_binary() {
        let (tokens, errors) = lex("0x1f 0b101");
        assert_eq!(tokens[0].lexeme, "0x1f");
        assert_eq!(tokens[1].lexeme, "0b101");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_lexer_invalid_hex() {
        let (tokens, errors) = lex("0x");
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("hexadecimal"));
    }

    #[test]
    fn test_lexer_string_retains_quotes() {
        let (tokens, _) = lex(r#""hello""#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "\"hello\"");
    }

    #[test]
    fn test_lexer_string_escapes() {
        let (tokens, _) = lex(r#""a\nb\t\\c\"d""#);
        assert_eq!(tokens[0].lexeme, "\"a\nb\t\\c\"d\"");
    }

    #[test]
    fn test_lexer_string_unknown_escape_passes_through() {
        let (tokens, _) = lex(r#""\q""#);
        assert_eq!(tokens[0].lexeme, "\"q\"");
    }

    #[test]
    fn test_lexer_unterminated_string() {
        let (tokens, errors) = lex("\"abc");
        // No string token is emitted; the parser sees EOF immediately
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated string literal");
    }

    #[test]
    fn test_lexer_template_verbatim() {
        let (tokens, _) = lex("`a ${x + {y: 1}.y} b`");
        assert_eq!(tokens[0].kind, TokenKind::Template);
        assert_eq!(tokens[0].lexeme, "`a ${x + {y: 1}.y} b`");
    }

    #[test]
    fn test_lexer_unterminated_template() {
        let (_, errors) = lex("`abc");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated template literal");
    }

    #[test]
    fn test_lexer_comments_are_tokens() {
        let (tokens, errors) = lex("// line\n/* block */ x");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].lexeme, "// line");
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].lexeme, "/* block */");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_lexer_unterminated_block_comment_emits_partial() {
        let (tokens, errors) = lex("/* open");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].lexeme, "/* open");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated block comment");
    }

    #[test]
    fn test_lexer_operator_longest_match() {
        let (tokens, _) = lex("=== == = **= ** >>> >> >");
        let lexemes: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(
            lexemes,
            vec!["===", "==", "=", "**=", "**", ">>>", ">>", ">"]
        );
    }

    #[test]
    fn test_lexer_punctuators() {
        let (tokens, _) = lex("... ?. . ;");
        assert_eq!(tokens[0].lexeme, "...");
        assert_eq!(tokens[0].kind, TokenKind::Punctuator);
        assert_eq!(tokens[1].lexeme, "?.");
        assert_eq!(tokens[2].lexeme, ".");
        assert_eq!(tokens[3].lexeme, ";");
    }

    #[test]
    fn test_lexer_unexpected_character() {
        let (tokens, errors) = lex("@");
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unexpected character: '@'");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_lexer_positions() {
        let (tokens, _) = lex("let x\n  = 1;");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 5));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 5));
    }

    #[test]
    fn test_lexer_byte_offsets_monotone() {
        let (tokens, _) = lex("const PI = 3.14; // π\nlet x = \"ñ\";");
        for pair in tokens.windows(2) {
            assert!(pair[1].start >= pair[0].end);
        }
    }

    #[test]
    fn test_lexer_single_eof() {
        let (tokens, _) = lex("a b c");
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eofs, 1);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_lexer_token_count_scenario() {
        // const PI = 3.14; -> 5 tokens excluding EOF
        let (tokens, errors) = lex("const PI = 3.14;");
        assert!(errors.is_empty());
        assert_eq!(tokens.len() - 1, 5);
    }
}
