//! Double-dispatch visitor protocol.
//!
//! [`Visitable::accept`] calls the one [`Visitor`] method that matches the
//! node's kind and returns its result. It never descends on its own: a
//! visitor that wants the children calls [`Visitable::traverse`], usually
//! from inside its own `visit_*` method. That lets a visitor prune subtrees
//! or pick its own order.
//!
//! `traverse` dispatches into the direct children only, in source order:
//!
//! | node                      | children visited                         |
//! |---------------------------|------------------------------------------|
//! | block                     | body                                     |
//! | var decl                  | name, then initializer                   |
//! | import / export           | names                                    |
//! | string interpolation      | parts, left to right                     |
//! | spread / group / await    | inner expression                         |
//! | comma / list              | elements                                 |
//! | in/of                     | left, then right                         |
//! | list type / nullable type | element / inner type                     |
//! | source unit               | imports, then top-level nodes            |
//! | compilation               | every value unit, then every source unit |
//!
//! Leaves have nothing to traverse.

use crate::{
    compilation::{AstCompilation, AstSource},
    nodes::{
        AstNode, AwaitExpr, BlockStatement, BooleanLiteral, CommaExpr, EmptyStatement, ExportDecl,
        FloatLiteral, GroupExpr, IdentifierExpr, ImportDecl, InOfExpr, IntegerLiteral,
        ListLiteral, ListType, Location, NamedType, NodeKind, NullLiteral, NullableType,
        SpreadExpr, StringInterpolation, StringLiteral, VarDecl,
    },
};

/// One method per concrete kind. None of them has a default body, so a
/// visitor that forgets a kind does not compile.
pub trait Visitor {
    type Output;

    fn visit_empty(&mut self, node: &EmptyStatement) -> Self::Output;
    fn visit_block(&mut self, node: &BlockStatement) -> Self::Output;
    fn visit_var_decl(&mut self, node: &VarDecl) -> Self::Output;
    fn visit_import(&mut self, node: &ImportDecl) -> Self::Output;
    fn visit_export(&mut self, node: &ExportDecl) -> Self::Output;
    fn visit_null(&mut self, node: &NullLiteral) -> Self::Output;
    fn visit_boolean(&mut self, node: &BooleanLiteral) -> Self::Output;
    fn visit_integer(&mut self, node: &IntegerLiteral) -> Self::Output;
    fn visit_float(&mut self, node: &FloatLiteral) -> Self::Output;
    fn visit_string(&mut self, node: &StringLiteral) -> Self::Output;
    fn visit_interpolation(&mut self, node: &StringInterpolation) -> Self::Output;
    fn visit_identifier(&mut self, node: &IdentifierExpr) -> Self::Output;
    fn visit_spread(&mut self, node: &SpreadExpr) -> Self::Output;
    fn visit_comma(&mut self, node: &CommaExpr) -> Self::Output;
    fn visit_list(&mut self, node: &ListLiteral) -> Self::Output;
    fn visit_in_of(&mut self, node: &InOfExpr) -> Self::Output;
    fn visit_group(&mut self, node: &GroupExpr) -> Self::Output;
    fn visit_await(&mut self, node: &AwaitExpr) -> Self::Output;
    fn visit_named_type(&mut self, node: &NamedType) -> Self::Output;
    fn visit_list_type(&mut self, node: &ListType) -> Self::Output;
    fn visit_nullable_type(&mut self, node: &NullableType) -> Self::Output;
    fn visit_source(&mut self, source: &AstSource) -> Self::Output;
    fn visit_compilation(&mut self, compilation: &AstCompilation) -> Self::Output;
}

pub trait Visitable {
    /// Calls the visitor method for this kind.
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output;

    /// Calls [`accept`](Visitable::accept) on each direct child.
    fn traverse<V: Visitor + ?Sized>(&self, _visitor: &mut V) {}
}

macro_rules! visitable_leaves {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            impl Visitable for $name {
                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$method(self)
                }
            }
        )*
    };
}

visitable_leaves! {
    EmptyStatement => visit_empty,
    NullLiteral => visit_null,
    BooleanLiteral => visit_boolean,
    IntegerLiteral => visit_integer,
    FloatLiteral => visit_float,
    StringLiteral => visit_string,
    IdentifierExpr => visit_identifier,
    NamedType => visit_named_type,
}

impl Visitable for BlockStatement {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_block(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for node in &self.body {
            node.accept(visitor);
        }
    }
}

impl Visitable for VarDecl {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_var_decl(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.name.accept(visitor);
        if let Some(initializer) = &self.initializer {
            initializer.accept(visitor);
        }
    }
}

impl Visitable for ImportDecl {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_import(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for name in &self.names {
            name.accept(visitor);
        }
    }
}

impl Visitable for ExportDecl {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_export(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for name in &self.names {
            name.accept(visitor);
        }
    }
}

impl Visitable for StringInterpolation {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_interpolation(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for part in &self.parts {
            part.accept(visitor);
        }
    }
}

impl Visitable for SpreadExpr {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_spread(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.expression.accept(visitor);
    }
}

impl Visitable for CommaExpr {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_comma(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for expression in &self.expressions {
            expression.accept(visitor);
        }
    }
}

impl Visitable for ListLiteral {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_list(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for element in &self.elements {
            element.accept(visitor);
        }
    }
}

impl Visitable for InOfExpr {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_in_of(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.left.accept(visitor);
        self.right.accept(visitor);
    }
}

impl Visitable for GroupExpr {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_group(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.expression.accept(visitor);
    }
}

impl Visitable for AwaitExpr {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_await(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.expression.accept(visitor);
    }
}

impl Visitable for ListType {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_list_type(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.element.accept(visitor);
    }
}

impl Visitable for NullableType {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_nullable_type(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.inner.accept(visitor);
    }
}

impl Visitable for AstSource {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_source(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for node in self.imports().iter().chain(self.nodes()) {
            node.accept(visitor);
        }
    }
}

impl Visitable for AstCompilation {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_compilation(self)
    }

    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for unit in self.units() {
            unit.accept(visitor);
        }
    }
}

/// Read-only visitor that records `(kind, span)` of every node in pre-order.
#[derive(Debug, Default)]
pub struct SpanCollector {
    spans: Vec<(NodeKind, Location)>,
}

impl SpanCollector {
    /// Collects the spans of `root` and all its descendants.
    #[must_use]
    pub fn collect<T: Visitable + ?Sized>(root: &T) -> Vec<(NodeKind, Location)> {
        let mut collector = SpanCollector::default();
        root.accept(&mut collector);
        collector.spans
    }

    #[must_use]
    pub fn spans(&self) -> &[(NodeKind, Location)] {
        &self.spans
    }

    #[must_use]
    pub fn into_spans(self) -> Vec<(NodeKind, Location)> {
        self.spans
    }

    fn enter<N: AstNode + Visitable>(&mut self, node: &N) {
        self.spans.push((node.kind(), node.location()));
        node.traverse(self);
    }
}

impl Visitor for SpanCollector {
    type Output = ();

    fn visit_empty(&mut self, node: &EmptyStatement) {
        self.enter(node);
    }

    fn visit_block(&mut self, node: &BlockStatement) {
        self.enter(node);
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        self.enter(node);
    }

    fn visit_import(&mut self, node: &ImportDecl) {
        self.enter(node);
    }

    fn visit_export(&mut self, node: &ExportDecl) {
        self.enter(node);
    }

    fn visit_null(&mut self, node: &NullLiteral) {
        self.enter(node);
    }

    fn visit_boolean(&mut self, node: &BooleanLiteral) {
        self.enter(node);
    }

    fn visit_integer(&mut self, node: &IntegerLiteral) {
        self.enter(node);
    }

    fn visit_float(&mut self, node: &FloatLiteral) {
        self.enter(node);
    }

    fn visit_string(&mut self, node: &StringLiteral) {
        self.enter(node);
    }

    fn visit_interpolation(&mut self, node: &StringInterpolation) {
        self.enter(node);
    }

    fn visit_identifier(&mut self, node: &IdentifierExpr) {
        self.enter(node);
    }

    fn visit_spread(&mut self, node: &SpreadExpr) {
        self.enter(node);
    }

    fn visit_comma(&mut self, node: &CommaExpr) {
        self.enter(node);
    }

    fn visit_list(&mut self, node: &ListLiteral) {
        self.enter(node);
    }

    fn visit_in_of(&mut self, node: &InOfExpr) {
        self.enter(node);
    }

    fn visit_group(&mut self, node: &GroupExpr) {
        self.enter(node);
    }

    fn visit_await(&mut self, node: &AwaitExpr) {
        self.enter(node);
    }

    fn visit_named_type(&mut self, node: &NamedType) {
        self.enter(node);
    }

    fn visit_list_type(&mut self, node: &ListType) {
        self.enter(node);
    }

    fn visit_nullable_type(&mut self, node: &NullableType) {
        self.enter(node);
    }

    fn visit_source(&mut self, source: &AstSource) {
        source.traverse(self);
    }

    fn visit_compilation(&mut self, compilation: &AstCompilation) {
        compilation.traverse(self);
    }
}
