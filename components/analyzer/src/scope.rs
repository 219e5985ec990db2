//! Scope tree and symbol table for AulaScript semantic analysis

use core_types::SourcePosition;
use serde::Serialize;
use std::fmt;

/// Kind of a scope in the scope tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// The root scope, preloaded with builtins
    Global,
    /// A function body (parameters and body share this scope)
    Function,
    /// A block statement or `for` header
    Block,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::Global => "global",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
        };
        write!(f, "{}", name)
    }
}

/// Kind of a symbol binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// `var` or `let` binding
    Variable,
    /// `const` binding
    Const,
    /// Function declaration
    Function,
    /// Function parameter
    Parameter,
    /// Preloaded global binding
    Builtin,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Const => "const",
            SymbolKind::Function => "function",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Builtin => "builtin",
        };
        write!(f, "{}", name)
    }
}

/// Primitive class inferred from a literal, used by the arithmetic and
/// comparison heuristics. This is the only type inference the analyzer
/// performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueClass {
    /// Numeric literal
    Number,
    /// String literal
    String,
    /// Boolean literal
    Boolean,
    /// `null` (typeof null is "object")
    Object,
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueClass::Number => "number",
            ValueClass::String => "string",
            ValueClass::Boolean => "boolean",
            ValueClass::Object => "object",
        };
        write!(f, "{}", name)
    }
}

/// A named binding in a scope, with its declaration coordinates and usage
/// flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolInfo {
    /// Symbol name
    pub name: String,
    /// Binding kind
    pub kind: SymbolKind,
    /// Declaration line (0 for builtins)
    pub line: u32,
    /// Declaration column (0 for builtins)
    pub column: u32,
    /// Declaration byte offset (0 for builtins)
    pub offset: usize,
    /// Whether the symbol has been given a value; transitions false → true
    /// at most once
    pub initialized: bool,
    /// Whether the symbol has been referenced
    pub used: bool,
    /// Whether the symbol was installed by the hoisting pre-pass
    pub hoisted: bool,
    /// Whether the symbol is a preloaded builtin
    pub builtin: bool,
    /// Ordered parameter names, for function symbols
    pub params: Option<Vec<String>>,
    /// Literal class of the initializer, when it was a literal
    pub value_class: Option<ValueClass>,
}

impl SymbolInfo {
    /// Create a user symbol declared at the given position.
    pub fn new(name: impl Into<String>, kind: SymbolKind, position: SourcePosition) -> Self {
        Self {
            name: name.into(),
            kind,
            line: position.line,
            column: position.column,
            offset: position.offset,
            initialized: false,
            used: false,
            hoisted: false,
            builtin: false,
            params: None,
            value_class: None,
        }
    }

    /// Source position of the declaration site.
    pub fn position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    /// Create a preloaded builtin symbol.
    fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::Builtin,
            line: 0,
            column: 0,
            offset: 0,
            initialized: true,
            used: false,
            hoisted: false,
            builtin: true,
            params: None,
            value_class: None,
        }
    }
}

/// A node of the scope tree.
///
/// Parent links are indices into the tree's arena, never ownership; the
/// tree is owned top-down from the global scope.
#[derive(Debug, Clone, Serialize)]
pub struct Scope {
    /// Index of this scope in the arena
    pub id: usize,
    /// Index of the parent scope
    pub parent: Option<usize>,
    /// Scope kind
    pub kind: ScopeKind,
    /// Indices of child scopes, in creation order
    pub children: Vec<usize>,
    /// Symbols in declaration order; names are unique within a scope
    pub symbols: Vec<SymbolInfo>,
}

/// Bindings preloaded in the global scope.
pub const BUILTINS: [&str; 24] = [
    "console",
    "window",
    "document",
    "Array",
    "Object",
    "String",
    "Number",
    "Boolean",
    "Date",
    "RegExp",
    "Math",
    "JSON",
    "parseInt",
    "parseFloat",
    "isNaN",
    "isFinite",
    "eval",
    "setTimeout",
    "setInterval",
    "clearTimeout",
    "clearInterval",
    "undefined",
    "NaN",
    "Infinity",
];

/// Arena-allocated scope tree with a cursor at the scope currently being
/// analyzed.
///
/// Lookup walks up the parent chain; definition writes only into the
/// current scope.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    #[serde(skip)]
    current: usize,
}

impl ScopeTree {
    /// Create a tree containing the global scope, preloaded with builtins.
    pub fn new() -> Self {
        let mut global = Scope {
            id: 0,
            parent: None,
            kind: ScopeKind::Global,
            children: Vec::new(),
            symbols: Vec::new(),
        };
        for name in BUILTINS {
            global.symbols.push(SymbolInfo::builtin(name));
        }
        Self {
            scopes: vec![global],
            current: 0,
        }
    }

    /// Enter a new child scope of the current one and return its id.
    pub fn enter_scope(&mut self, kind: ScopeKind) -> usize {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            id,
            parent: Some(self.current),
            kind,
            children: Vec::new(),
            symbols: Vec::new(),
        });
        self.scopes[self.current].children.push(id);
        self.current = id;
        id
    }

    /// Return to the parent of the current scope.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Id of the scope currently being analyzed.
    pub fn current_id(&self) -> usize {
        self.current
    }

    /// All scopes, indexed by id; children lists preserve creation order.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Look up a name in the current scope only.
    pub fn declared_in_current(&self, name: &str) -> Option<&SymbolInfo> {
        self.scopes[self.current]
            .symbols
            .iter()
            .find(|s| s.name == name)
    }

    /// Install a symbol in the current scope. The caller checks for
    /// collisions first (invariant I1).
    pub fn declare(&mut self, symbol: SymbolInfo) {
        self.scopes[self.current].symbols.push(symbol);
    }

    /// Resolve a name through the scope chain, starting at the current
    /// scope.
    pub fn resolve(&self, name: &str) -> Option<&SymbolInfo> {
        let mut scope = self.current;
        loop {
            if let Some(symbol) = self.scopes[scope].symbols.iter().find(|s| s.name == name) {
                return Some(symbol);
            }
            scope = self.scopes[scope].parent?;
        }
    }

    /// Resolve a name through the scope chain, mutably.
    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut SymbolInfo> {
        let mut scope = self.current;
        loop {
            if self.scopes[scope].symbols.iter().any(|s| s.name == name) {
                return self.scopes[scope]
                    .symbols
                    .iter_mut()
                    .find(|s| s.name == name);
            }
            scope = self.scopes[scope].parent?;
        }
    }

    /// Total number of user-declared (non-builtin) symbols in the tree.
    pub fn declared_symbol_count(&self) -> usize {
        self.scopes
            .iter()
            .flat_map(|s| s.symbols.iter())
            .filter(|s| !s.builtin)
            .count()
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
