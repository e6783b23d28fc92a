//! Identity of the text a unit was parsed from.
//!
//! The source-text object belongs to the caller. Units and nodes only hold a
//! [`SourceRef`] to it and read its name, kind and line table through
//! [`SourceText`], so they always agree with it.

use core::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// What a resource holds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Executable module with imports and exports.
    Module,
    /// Executable script without a module interface.
    Script,
    /// Data-only resource parsed to a value.
    Data,
}

impl ResourceKind {
    /// Returns `true` for resources kept in the "values" side of a compilation.
    #[must_use]
    pub fn is_value(self) -> bool {
        matches!(self, ResourceKind::Data)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Module => write!(f, "module"),
            ResourceKind::Script => write!(f, "script"),
            ResourceKind::Data => write!(f, "data"),
        }
    }
}

pub trait SourceText: fmt::Debug {
    fn full_name(&self) -> &str;
    fn resource_kind(&self) -> ResourceKind;
    /// Byte offset at which each line starts; the first entry is `0`.
    fn line_offsets(&self) -> &[u32];
}

/// Shared handle to a source-text object. Two handles are equal when they
/// point at the same object.
#[derive(Clone)]
pub struct SourceRef(Rc<dyn SourceText>);

impl SourceRef {
    #[must_use]
    pub fn new(source: Rc<dyn SourceText>) -> Self {
        Self(source)
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        self.0.full_name()
    }

    #[must_use]
    pub fn resource_kind(&self) -> ResourceKind {
        self.0.resource_kind()
    }

    #[must_use]
    pub fn line_offsets(&self) -> &[u32] {
        self.0.line_offsets()
    }

    /// Converts a byte offset to a 1-based `(line, column)` pair.
    #[must_use]
    pub fn position_of(&self, offset: u32) -> (u32, u32) {
        let offsets = self.line_offsets();
        let line = offsets.partition_point(|&start| start <= offset).max(1);
        let column = offset
            .saturating_sub(offsets.get(line - 1).copied().unwrap_or(0))
            .saturating_add(1);
        (u32::try_from(line).unwrap_or(u32::MAX), column)
    }
}

impl<S: SourceText + 'static> From<S> for SourceRef {
    fn from(source: S) -> Self {
        Self(Rc::new(source))
    }
}

impl PartialEq for SourceRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl Eq for SourceRef {}

impl fmt::Debug for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceRef").field(&self.full_name()).finish()
    }
}

/// In-memory source text.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    full_name: String,
    kind: ResourceKind,
    text: String,
    line_offsets: Vec<u32>,
}

impl SourceBuffer {
    #[must_use]
    pub fn new(full_name: impl Into<String>, kind: ResourceKind, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_offsets = std::iter::once(0)
            .chain(
                text.match_indices('\n')
                    .map(|(index, _)| u32::try_from(index + 1).unwrap_or(u32::MAX)),
            )
            .collect();
        Self {
            full_name: full_name.into(),
            kind,
            text,
            line_offsets,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl SourceText for SourceBuffer {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn resource_kind(&self) -> ResourceKind {
        self.kind
    }

    fn line_offsets(&self) -> &[u32] {
        &self.line_offsets
    }
}
