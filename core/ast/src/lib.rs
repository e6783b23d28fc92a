#![warn(clippy::pedantic)]
//! Syntax tree core of the Quill front end.
//!
//! The crate defines the closed set of node kinds built by the parser, the
//! comment and blank-line annotations attached to them, the visitor protocol
//! later passes use to walk the tree, and the per-file and whole-program
//! units the tree is delivered in. Identifiers are created unbound and are
//! bound in place, exactly once, by a resolver.
pub mod annotations;
pub mod binding;
pub mod compilation;
pub mod diagnostics;
pub mod errors;
pub mod nodes;
pub(crate) mod nodes_impl;
pub mod source;
pub mod token;
pub mod visitor;

pub use annotations::{Annotation, Annotations, Comment};
pub use binding::{Binding, BindingState, DeclarationRef, DeferredBinding, NamespaceRef};
pub use compilation::{AstCompilation, AstSource, ResolutionState};
pub use diagnostics::{Diagnostic, Severity};
pub use errors::AstError;
pub use nodes::{AstNode, ConstValue, Location, Node, NodeKind, TypeExpr};
pub use source::{ResourceKind, SourceBuffer, SourceRef, SourceText};
pub use token::Token;
pub use visitor::{SpanCollector, Visitable, Visitor};
