use core::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{annotations::Annotations, binding::DeferredBinding, source::SourceRef};

/// Source span of a node, copied verbatim from the token or tokens that
/// produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
    pub length: u32,
}

impl Location {
    #[must_use]
    pub fn new(line: u32, column: u32, offset: u32, length: u32) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// Byte offset one past the last byte of the span.
    #[must_use]
    pub fn end(&self) -> u32 {
        self.offset.saturating_add(self.length)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Classification flags, fixed when the node is constructed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NodeFlags {
    pub is_statement: bool,
    pub is_block: bool,
    pub is_await: bool,
}

impl NodeFlags {
    #[must_use]
    pub(crate) fn expression(is_await: bool) -> Self {
        Self {
            is_statement: false,
            is_block: false,
            is_await,
        }
    }

    #[must_use]
    pub(crate) fn statement(is_await: bool) -> Self {
        Self {
            is_statement: true,
            is_block: false,
            is_await,
        }
    }

    #[must_use]
    pub(crate) fn block(is_await: bool) -> Self {
        Self {
            is_statement: true,
            is_block: true,
            is_await,
        }
    }
}

/// Discriminant tag of every concrete node kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    Empty,
    Block,
    VarDecl,
    Import,
    Export,
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Interpolation,
    Identifier,
    Spread,
    Comma,
    List,
    InOf,
    Group,
    Await,
    NamedType,
    ListType,
    NullableType,
}

impl NodeKind {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Empty => "EmptyStatement",
            NodeKind::Block => "BlockStatement",
            NodeKind::VarDecl => "VarDecl",
            NodeKind::Import => "ImportDecl",
            NodeKind::Export => "ExportDecl",
            NodeKind::Null => "NullLiteral",
            NodeKind::Boolean => "BooleanLiteral",
            NodeKind::Integer => "IntegerLiteral",
            NodeKind::Float => "FloatLiteral",
            NodeKind::String => "StringLiteral",
            NodeKind::Interpolation => "StringInterpolation",
            NodeKind::Identifier => "IdentifierExpr",
            NodeKind::Spread => "SpreadExpr",
            NodeKind::Comma => "CommaExpr",
            NodeKind::List => "ListLiteral",
            NodeKind::InOf => "InOfExpr",
            NodeKind::Group => "GroupExpr",
            NodeKind::Await => "AwaitExpr",
            NodeKind::NamedType => "NamedType",
            NodeKind::ListType => "ListType",
            NodeKind::NullableType => "NullableType",
        }
    }

    /// Returns `true` for the kinds that carry a constant value.
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::Null
                | NodeKind::Boolean
                | NodeKind::Integer
                | NodeKind::Float
                | NodeKind::String
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Value of a literal node.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum ConstValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Attributes shared by every node.
pub trait AstNode {
    fn kind(&self) -> NodeKind;
    fn location(&self) -> Location;
    fn flags(&self) -> NodeFlags;
    fn annotations(&self) -> &Annotations;
    fn annotations_mut(&mut self) -> &mut Annotations;
    fn source(&self) -> Option<&SourceRef>;
    fn const_value(&self) -> Option<ConstValue>;

    fn is_statement(&self) -> bool {
        self.flags().is_statement
    }

    fn is_expression(&self) -> bool {
        !self.flags().is_statement
    }

    fn is_block(&self) -> bool {
        self.flags().is_block
    }

    fn is_await(&self) -> bool {
        self.flags().is_await
    }

    fn is_const_value(&self) -> bool {
        self.const_value().is_some()
    }

    /// Documentation comments written before the node, one per line.
    fn documentation(&self) -> String {
        self.annotations().documentation()
    }
}

macro_rules! ast_node {
    (@const_value $node:ident) => {
        None
    };

    (@const_value $node:ident $this:ident $value:block) => {{
        let $this = $node;
        Some($value)
    }};

    (
        $(#[$outer:meta])*
        $struct_vis:vis struct $name:ident => $kind:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field_name:ident : $field_ty:ty
            ),* $(,)?
        }
        $( const($this:ident) $value:block )?
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Debug)]
        $struct_vis struct $name {
            pub location: $crate::nodes::Location,
            pub annotations: $crate::annotations::Annotations,
            pub source: Option<$crate::source::SourceRef>,
            pub(crate) flags: $crate::nodes::NodeFlags,
            $(
                $(#[$field_attr])*
                $field_vis $field_name : $field_ty,
            )*
        }

        impl $name {
            pub const KIND: $crate::nodes::NodeKind = $crate::nodes::NodeKind::$kind;

            /// Attaches the back-reference to the originating source.
            #[must_use]
            pub fn with_source(mut self, source: $crate::source::SourceRef) -> Self {
                self.source = Some(source);
                self
            }

            #[must_use]
            pub fn with_annotations(mut self, annotations: $crate::annotations::Annotations) -> Self {
                self.annotations = annotations;
                self
            }
        }

        impl $crate::nodes::AstNode for $name {
            fn kind(&self) -> $crate::nodes::NodeKind {
                Self::KIND
            }

            fn location(&self) -> $crate::nodes::Location {
                self.location
            }

            fn flags(&self) -> $crate::nodes::NodeFlags {
                self.flags
            }

            fn annotations(&self) -> &$crate::annotations::Annotations {
                &self.annotations
            }

            fn annotations_mut(&mut self) -> &mut $crate::annotations::Annotations {
                &mut self.annotations
            }

            fn source(&self) -> Option<&$crate::source::SourceRef> {
                self.source.as_ref()
            }

            fn const_value(&self) -> Option<$crate::nodes::ConstValue> {
                ast_node!(@const_value self $( $this $value )?)
            }
        }
    };
}

macro_rules! ast_nodes {
    (
        $(
            $(#[$outer:meta])*
            pub struct $name:ident => $kind:ident { $($fields:tt)* }
            $( const($this:ident) $value:block )?
        )+
    ) => {
        $(
            ast_node! {
                $(#[$outer])*
                pub struct $name => $kind { $($fields)* }
                $( const($this) $value )?
            }
        )+
    };
}

macro_rules! ast_enum {
    (
        $(#[$outer:meta])*
        $enum_vis:vis enum $name:ident {
            $(
                $(#[$arm_attr:meta])*
                $arm:ident($inner:ty),
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Debug)]
        $enum_vis enum $name {
            $(
                $(#[$arm_attr])*
                $arm($inner),
            )*
        }

        impl $crate::nodes::AstNode for $name {
            fn kind(&self) -> $crate::nodes::NodeKind {
                match self {
                    $( $name::$arm(n) => n.kind(), )*
                }
            }

            fn location(&self) -> $crate::nodes::Location {
                match self {
                    $( $name::$arm(n) => n.location(), )*
                }
            }

            fn flags(&self) -> $crate::nodes::NodeFlags {
                match self {
                    $( $name::$arm(n) => n.flags(), )*
                }
            }

            fn annotations(&self) -> &$crate::annotations::Annotations {
                match self {
                    $( $name::$arm(n) => n.annotations(), )*
                }
            }

            fn annotations_mut(&mut self) -> &mut $crate::annotations::Annotations {
                match self {
                    $( $name::$arm(n) => n.annotations_mut(), )*
                }
            }

            fn source(&self) -> Option<&$crate::source::SourceRef> {
                match self {
                    $( $name::$arm(n) => n.source(), )*
                }
            }

            fn const_value(&self) -> Option<$crate::nodes::ConstValue> {
                match self {
                    $( $name::$arm(n) => n.const_value(), )*
                }
            }
        }

        impl $crate::visitor::Visitable for $name {
            fn accept<V: $crate::visitor::Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match self {
                    $( $name::$arm(n) => n.accept(visitor), )*
                }
            }

            fn traverse<V: $crate::visitor::Visitor + ?Sized>(&self, visitor: &mut V) {
                match self {
                    $( $name::$arm(n) => n.traverse(visitor), )*
                }
            }
        }
    };
}

ast_enum! {
    /// Any node of the tree.
    pub enum Node {
        Empty(Box<EmptyStatement>),
        Block(Box<BlockStatement>),
        VarDecl(Box<VarDecl>),
        Import(Box<ImportDecl>),
        Export(Box<ExportDecl>),
        Null(Box<NullLiteral>),
        Boolean(Box<BooleanLiteral>),
        Integer(Box<IntegerLiteral>),
        Float(Box<FloatLiteral>),
        String(Box<StringLiteral>),
        Interpolation(Box<StringInterpolation>),
        Identifier(Box<IdentifierExpr>),
        Spread(Box<SpreadExpr>),
        Comma(Box<CommaExpr>),
        List(Box<ListLiteral>),
        InOf(Box<InOfExpr>),
        Group(Box<GroupExpr>),
        Await(Box<AwaitExpr>),
        Type(TypeExpr),
    }
}

ast_enum! {
    /// Type expressions. Every variant reports whether it names a locally
    /// declared type or one referenced from elsewhere.
    pub enum TypeExpr {
        Named(Box<NamedType>),
        List(Box<ListType>),
        Nullable(Box<NullableType>),
    }
}

ast_nodes! {

    pub struct EmptyStatement => Empty {}

    pub struct BlockStatement => Block {
        pub body: Vec<Node>,
    }

    pub struct VarDecl => VarDecl {
        pub name: IdentifierExpr,
        pub initializer: Option<Node>,
        pub is_const: bool,
    }

    pub struct ImportDecl => Import {
        pub path: String,
        pub names: Vec<IdentifierExpr>,
        pub alias: Option<String>,
    }

    pub struct ExportDecl => Export {
        pub names: Vec<IdentifierExpr>,
    }

    pub struct NullLiteral => Null {}
    const(_node) { ConstValue::Null }

    pub struct BooleanLiteral => Boolean {
        pub value: bool,
    }
    const(node) { ConstValue::Boolean(node.value) }

    pub struct IntegerLiteral => Integer {
        pub value: i64,
    }
    const(node) { ConstValue::Integer(node.value) }

    pub struct FloatLiteral => Float {
        pub value: f64,
    }
    const(node) { ConstValue::Float(node.value) }

    pub struct StringLiteral => String {
        pub value: String,
    }
    const(node) { ConstValue::String(node.value.clone()) }

    /// A string with embedded expressions. Text segments are kept as
    /// [`StringLiteral`] parts, in source order.
    pub struct StringInterpolation => Interpolation {
        pub parts: Vec<Node>,
    }

    pub struct IdentifierExpr => Identifier {
        pub name: String,
        /// Written with an explicit self/qualifier marker.
        pub is_marked: bool,
        /// Local reference, as opposed to a member-style one.
        pub is_local: bool,
        pub binding: DeferredBinding,
    }

    pub struct SpreadExpr => Spread {
        pub expression: Node,
    }

    pub struct CommaExpr => Comma {
        pub expressions: Vec<Node>,
    }

    pub struct ListLiteral => List {
        pub elements: Vec<Node>,
    }

    /// `left in right` / `left of right`. `value_of` selects iteration over
    /// values rather than keys.
    pub struct InOfExpr => InOf {
        pub left: Node,
        pub right: Node,
        pub value_of: bool,
    }

    pub struct GroupExpr => Group {
        pub expression: Node,
    }

    pub struct AwaitExpr => Await {
        pub expression: Node,
    }

    pub struct NamedType => NamedType {
        pub name: String,
        pub qualifier: Option<String>,
        pub is_local: bool,
    }

    pub struct ListType => ListType {
        pub element: TypeExpr,
    }

    pub struct NullableType => NullableType {
        pub inner: TypeExpr,
    }

}
