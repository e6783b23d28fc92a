//! Error types for the AST crate.
//!
//! These are contract violations of the tree model itself: binding an
//! identifier twice, resolving a unit twice, and so on. Problems found in the
//! program being compiled are never reported through this type; they are
//! collected as [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.

use thiserror::Error;

use crate::nodes::Location;

/// Errors raised when a caller breaks the lifecycle rules of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum AstError {
    /// The identifier already carries a binding.
    #[error("{location}: identifier `{name}` is already bound")]
    AlreadyBound { name: String, location: Location },

    /// The unit was already marked resolved.
    #[error("source `{path}` is already resolved")]
    AlreadyResolved { path: String },

    /// An optional annotation slot was filled twice.
    #[error("the {slot} annotation slot is already occupied")]
    AnnotationSlotOccupied { slot: &'static str },

    /// A unit with the same path was already added to the compilation.
    #[error("a unit for `{path}` is already part of the compilation")]
    DuplicateUnit { path: String },

    /// A literal token could not be converted to its value.
    #[error("{location}: invalid {kind} literal `{lexeme}`")]
    InvalidLiteral {
        kind: &'static str,
        lexeme: String,
        location: Location,
    },
}
