use std::fmt::{self, Display, Formatter};

use quill_ast::{Diagnostic, Location};
use thiserror::Error;

/// Where a name was looked up when it turned out to be ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Declared at the top level of the unit itself.
    Module,
    /// Imported from the unit with the given path.
    Import(String),
}

impl Display for Candidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Module => write!(f, "this module"),
            Candidate::Import(path) => write!(f, "`{path}`"),
        }
    }
}

fn join(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" and ")
}

/// What went wrong, without the location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveErrorKind {
    #[error("unknown identifier `{name}`")]
    UnknownIdentifier { name: String },

    #[error("identifier `{name}` is ambiguous: declared in {}", join(.candidates))]
    AmbiguousIdentifier {
        name: String,
        candidates: Vec<Candidate>,
    },

    #[error("`{name}` refers to itself in its own initializer")]
    CircularReference { name: String },

    #[error("`{name}` is not exported by `{module}`")]
    NotExported { name: String, module: String },

    #[error("module `{path}` imported by `{importer}` is not part of the program")]
    UnknownModule { path: String, importer: String },

    #[error("`{name}` is already declared in this scope at {previous}")]
    DuplicateDeclaration { name: String, previous: Location },
}

/// A located resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub location: Location,
}

impl ResolveError {
    #[must_use]
    pub fn new(kind: ResolveErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ResolveErrorKind::UnknownIdentifier { name }
            | ResolveErrorKind::AmbiguousIdentifier { name, .. }
            | ResolveErrorKind::CircularReference { name }
            | ResolveErrorKind::NotExported { name, .. }
            | ResolveErrorKind::DuplicateDeclaration { name, .. } => Some(name),
            ResolveErrorKind::UnknownModule { .. } => None,
        }
    }
}

impl From<ResolveError> for Diagnostic {
    fn from(error: ResolveError) -> Self {
        Diagnostic::error(error.kind.to_string(), Some(error.location))
    }
}
