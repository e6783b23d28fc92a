//! Deferred binding of identifiers.
//!
//! The parser creates every [`IdentifierExpr`](crate::nodes::IdentifierExpr)
//! unbound. The resolver later stores one [`Binding`] in it, which pairs the
//! namespace the name was found in with the declaration it refers to. A
//! binding can be stored once and is never removed.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::nodes::Location;

/// Namespace in which a name was resolved.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum NamespaceRef {
    /// Names provided by the host rather than by any source file.
    Builtin,
    /// Top level of the unit with the given path.
    Module(String),
    /// A lexical scope, numbered by the resolver within its unit.
    Scope(u32),
}

/// Declaration an identifier refers to.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DeclarationRef {
    /// Full name of the unit holding the declaration.
    pub path: String,
    pub name: String,
    /// Span of the declaring occurrence.
    pub location: Location,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Binding {
    pub namespace: NamespaceRef,
    pub declaration: DeclarationRef,
}

/// Two-state view of a [`DeferredBinding`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BindingState<'a> {
    Unbound,
    Bound(&'a Binding),
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DeferredBinding {
    cell: OnceCell<Binding>,
}

impl DeferredBinding {
    #[must_use]
    pub fn state(&self) -> BindingState<'_> {
        match self.cell.get() {
            Some(binding) => BindingState::Bound(binding),
            None => BindingState::Unbound,
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<&Binding> {
        self.cell.get()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Stores the binding.
    ///
    /// # Errors
    ///
    /// Hands the binding back if one is already stored.
    pub fn bind(&self, binding: Binding) -> Result<(), Binding> {
        self.cell.set(binding)
    }
}
