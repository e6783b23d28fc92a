use crate::{
    annotations::Annotations,
    binding::{Binding, BindingState, DeclarationRef, DeferredBinding, NamespaceRef},
    errors::AstError,
    nodes::{
        AstNode, AwaitExpr, BlockStatement, BooleanLiteral, CommaExpr, EmptyStatement, ExportDecl,
        FloatLiteral, GroupExpr, IdentifierExpr, ImportDecl, InOfExpr, IntegerLiteral,
        ListLiteral, ListType, Location, NamedType, Node, NodeFlags, NullLiteral, NullableType,
        SpreadExpr, StringInterpolation, StringLiteral, TypeExpr, VarDecl,
    },
    token::Token,
};

fn any_await(nodes: &[Node]) -> bool {
    nodes.iter().any(AstNode::is_await)
}

macro_rules! into_node {
    ($($name:ident => $arm:ident),* $(,)?) => {
        $(
            impl From<$name> for Node {
                fn from(node: $name) -> Self {
                    Node::$arm(Box::new(node))
                }
            }
        )*
    };
}

into_node! {
    EmptyStatement => Empty,
    BlockStatement => Block,
    VarDecl => VarDecl,
    ImportDecl => Import,
    ExportDecl => Export,
    NullLiteral => Null,
    BooleanLiteral => Boolean,
    IntegerLiteral => Integer,
    FloatLiteral => Float,
    StringLiteral => String,
    StringInterpolation => Interpolation,
    IdentifierExpr => Identifier,
    SpreadExpr => Spread,
    CommaExpr => Comma,
    ListLiteral => List,
    InOfExpr => InOf,
    GroupExpr => Group,
    AwaitExpr => Await,
}

impl From<TypeExpr> for Node {
    fn from(ty: TypeExpr) -> Self {
        Node::Type(ty)
    }
}

impl From<NamedType> for TypeExpr {
    fn from(ty: NamedType) -> Self {
        TypeExpr::Named(Box::new(ty))
    }
}

impl From<ListType> for TypeExpr {
    fn from(ty: ListType) -> Self {
        TypeExpr::List(Box::new(ty))
    }
}

impl From<NullableType> for TypeExpr {
    fn from(ty: NullableType) -> Self {
        TypeExpr::Nullable(Box::new(ty))
    }
}

impl EmptyStatement {
    #[must_use]
    pub fn new(location: Location) -> Self {
        EmptyStatement {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::statement(false),
        }
    }
}

impl BlockStatement {
    #[must_use]
    pub fn new(body: Vec<Node>, location: Location) -> Self {
        BlockStatement {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::block(any_await(&body)),
            body,
        }
    }
}

impl VarDecl {
    #[must_use]
    pub fn new(
        name: IdentifierExpr,
        initializer: Option<Node>,
        is_const: bool,
        location: Location,
    ) -> Self {
        VarDecl {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::statement(initializer.as_ref().is_some_and(AstNode::is_await)),
            name,
            initializer,
            is_const,
        }
    }
}

impl ImportDecl {
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        names: Vec<IdentifierExpr>,
        alias: Option<String>,
        location: Location,
    ) -> Self {
        ImportDecl {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::statement(false),
            path: path.into(),
            names,
            alias,
        }
    }
}

impl ExportDecl {
    #[must_use]
    pub fn new(names: Vec<IdentifierExpr>, location: Location) -> Self {
        ExportDecl {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::statement(false),
            names,
        }
    }
}

impl NullLiteral {
    #[must_use]
    pub fn new(location: Location) -> Self {
        NullLiteral {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
        }
    }

    #[must_use]
    pub fn from_token(token: &Token) -> Self {
        Self::new(token.location)
    }
}

impl BooleanLiteral {
    #[must_use]
    pub fn new(value: bool, location: Location) -> Self {
        BooleanLiteral {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
            value,
        }
    }

    /// # Errors
    ///
    /// Returns [`AstError::InvalidLiteral`] unless the lexeme is `true` or `false`.
    pub fn from_token(token: &Token) -> Result<Self, AstError> {
        match token.lexeme.as_str() {
            "true" => Ok(Self::new(true, token.location)),
            "false" => Ok(Self::new(false, token.location)),
            _ => Err(invalid_literal("boolean", token)),
        }
    }
}

impl IntegerLiteral {
    #[must_use]
    pub fn new(value: i64, location: Location) -> Self {
        IntegerLiteral {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
            value,
        }
    }

    /// Parses decimal, `0x`, `0o` and `0b` lexemes; `_` separators are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::InvalidLiteral`] if the lexeme is malformed or out of range.
    pub fn from_token(token: &Token) -> Result<Self, AstError> {
        parse_integer(&token.lexeme)
            .map(|value| Self::new(value, token.location))
            .ok_or_else(|| invalid_literal("integer", token))
    }
}

impl FloatLiteral {
    #[must_use]
    pub fn new(value: f64, location: Location) -> Self {
        FloatLiteral {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
            value,
        }
    }

    /// # Errors
    ///
    /// Returns [`AstError::InvalidLiteral`] if the lexeme is not a decimal float.
    pub fn from_token(token: &Token) -> Result<Self, AstError> {
        parse_float(&token.lexeme)
            .map(|value| Self::new(value, token.location))
            .ok_or_else(|| invalid_literal("float", token))
    }
}

impl StringLiteral {
    #[must_use]
    pub fn new(value: impl Into<String>, location: Location) -> Self {
        StringLiteral {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
            value: value.into(),
        }
    }

    /// Builds the literal from a token, dropping one pair of enclosing quotes.
    /// Escape sequences are left to the lexer.
    #[must_use]
    pub fn from_token(token: &Token) -> Self {
        Self::new(unquote(&token.lexeme), token.location)
    }
}

impl StringInterpolation {
    #[must_use]
    pub fn new(parts: Vec<Node>, location: Location) -> Self {
        StringInterpolation {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(any_await(&parts)),
            parts,
        }
    }
}

impl IdentifierExpr {
    #[must_use]
    pub fn new(name: impl Into<String>, is_marked: bool, is_local: bool, location: Location) -> Self {
        IdentifierExpr {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
            name: name.into(),
            is_marked,
            is_local,
            binding: DeferredBinding::default(),
        }
    }

    #[must_use]
    pub fn from_token(token: &Token, is_marked: bool, is_local: bool) -> Self {
        Self::new(token.lexeme.clone(), is_marked, is_local, token.location)
    }

    #[must_use]
    pub fn binding_state(&self) -> BindingState<'_> {
        self.binding.state()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&NamespaceRef> {
        self.binding.get().map(|binding| &binding.namespace)
    }

    #[must_use]
    pub fn declaration(&self) -> Option<&DeclarationRef> {
        self.binding.get().map(|binding| &binding.declaration)
    }

    /// Stores the resolved namespace and declaration.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::AlreadyBound`] if the identifier was bound before;
    /// the existing binding is kept.
    pub fn bind(&self, binding: Binding) -> Result<(), AstError> {
        self.binding
            .bind(binding)
            .map_err(|_| AstError::AlreadyBound {
                name: self.name.clone(),
                location: self.location,
            })
    }
}

impl SpreadExpr {
    #[must_use]
    pub fn new(expression: Node, location: Location) -> Self {
        SpreadExpr {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(expression.is_await()),
            expression,
        }
    }
}

impl CommaExpr {
    #[must_use]
    pub fn new(expressions: Vec<Node>, location: Location) -> Self {
        CommaExpr {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(any_await(&expressions)),
            expressions,
        }
    }
}

impl ListLiteral {
    #[must_use]
    pub fn new(elements: Vec<Node>, location: Location) -> Self {
        ListLiteral {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(any_await(&elements)),
            elements,
        }
    }
}

impl InOfExpr {
    #[must_use]
    pub fn new(left: Node, right: Node, value_of: bool, location: Location) -> Self {
        InOfExpr {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(left.is_await() || right.is_await()),
            left,
            right,
            value_of,
        }
    }
}

impl GroupExpr {
    #[must_use]
    pub fn new(expression: Node, location: Location) -> Self {
        GroupExpr {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(expression.is_await()),
            expression,
        }
    }
}

impl AwaitExpr {
    #[must_use]
    pub fn new(expression: Node, location: Location) -> Self {
        AwaitExpr {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(true),
            expression,
        }
    }
}

impl NamedType {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        qualifier: Option<String>,
        is_local: bool,
        location: Location,
    ) -> Self {
        NamedType {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
            name: name.into(),
            qualifier,
            is_local,
        }
    }
}

impl ListType {
    #[must_use]
    pub fn new(element: TypeExpr, location: Location) -> Self {
        ListType {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
            element,
        }
    }
}

impl NullableType {
    #[must_use]
    pub fn new(inner: TypeExpr, location: Location) -> Self {
        NullableType {
            location,
            annotations: Annotations::default(),
            source: None,
            flags: NodeFlags::expression(false),
            inner,
        }
    }
}

impl TypeExpr {
    /// Returns `true` when the type is declared in the current unit rather
    /// than referenced from elsewhere.
    #[must_use]
    pub fn is_local(&self) -> bool {
        match self {
            TypeExpr::Named(named) => named.is_local,
            TypeExpr::List(list) => list.element.is_local(),
            TypeExpr::Nullable(nullable) => nullable.inner.is_local(),
        }
    }
}

fn invalid_literal(kind: &'static str, token: &Token) -> AstError {
    AstError::InvalidLiteral {
        kind,
        lexeme: token.lexeme.clone(),
        location: token.location,
    }
}

fn parse_integer(lexeme: &str) -> Option<i64> {
    let digits: String = lexeme.chars().filter(|c| *c != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits.as_str()),
    };
    if body.is_empty() || body.starts_with(['+', '-']) {
        return None;
    }
    i64::from_str_radix(body, radix).ok()
}

fn parse_float(lexeme: &str) -> Option<f64> {
    let digits: String = lexeme.chars().filter(|c| *c != '_').collect();
    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    digits.parse().ok()
}

fn unquote(lexeme: &str) -> &str {
    ['"', '\'', '`']
        .into_iter()
        .find_map(|quote| {
            lexeme
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(lexeme)
}
