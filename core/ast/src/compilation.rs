//! Per-file units and the whole-program aggregate.

use rustc_hash::FxHashMap;
use semver::Version;
use tracing::debug;

use crate::{
    diagnostics::Diagnostic,
    errors::AstError,
    nodes::Node,
    source::{ResourceKind, SourceRef},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ResolutionState {
    #[default]
    Unresolved,
    Resolved,
}

/// Parsed file: its imports and exports, top-level nodes and the diagnostics
/// raised while building them.
///
/// A unit may hold a partial node sequence together with the errors that
/// stopped the parser.
#[derive(Clone, Debug)]
pub struct AstSource {
    source: SourceRef,
    imports: Vec<Node>,
    nodes: Vec<Node>,
    diagnostics: Vec<Diagnostic>,
    resolution: ResolutionState,
}

impl AstSource {
    #[must_use]
    pub fn new(
        source: SourceRef,
        imports: Vec<Node>,
        nodes: Vec<Node>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            source,
            imports,
            nodes,
            diagnostics,
            resolution: ResolutionState::Unresolved,
        }
    }

    #[must_use]
    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        self.source.full_name()
    }

    #[must_use]
    pub fn resource_kind(&self) -> ResourceKind {
        self.source.resource_kind()
    }

    #[must_use]
    pub fn line_offsets(&self) -> &[u32] {
        self.source.line_offsets()
    }

    /// 1-based `(line, column)` of a byte offset in this unit.
    #[must_use]
    pub fn position_of(&self, offset: u32) -> (u32, u32) {
        self.source.position_of(offset)
    }

    /// Import and export declarations, in source order.
    #[must_use]
    pub fn imports(&self) -> &[Node] {
        &self.imports
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    #[must_use]
    pub fn resolution_state(&self) -> ResolutionState {
        self.resolution
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolution == ResolutionState::Resolved
    }

    /// Moves the unit to [`ResolutionState::Resolved`].
    ///
    /// # Errors
    ///
    /// Returns [`AstError::AlreadyResolved`] if the unit was resolved before.
    pub fn mark_resolved(&mut self) -> Result<(), AstError> {
        if self.is_resolved() {
            return Err(AstError::AlreadyResolved {
                path: self.full_name().to_string(),
            });
        }
        self.resolution = ResolutionState::Resolved;
        Ok(())
    }
}

/// Path-keyed map that iterates in insertion order.
#[derive(Clone, Debug, Default)]
struct UnitMap {
    units: Vec<AstSource>,
    index: FxHashMap<String, usize>,
}

impl UnitMap {
    fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    fn get(&self, path: &str) -> Option<&AstSource> {
        self.index.get(path).map(|&i| &self.units[i])
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut AstSource> {
        self.index.get(path).map(|&i| &mut self.units[i])
    }

    fn push(&mut self, unit: AstSource) {
        self.index
            .insert(unit.full_name().to_string(), self.units.len());
        self.units.push(unit);
    }

    fn len(&self) -> usize {
        self.units.len()
    }
}

/// Every unit of a program.
///
/// Data resources live in the "values" map, executable ones in the "sources"
/// map. Both keep insertion order, and traversal always visits all values
/// before any source.
#[derive(Clone, Debug)]
pub struct AstCompilation {
    values: UnitMap,
    sources: UnitMap,
    entry_path: String,
    entry_kind: ResourceKind,
    diagnostics: Vec<Diagnostic>,
    version: Option<Version>,
}

impl AstCompilation {
    #[must_use]
    pub fn new(entry_path: impl Into<String>, entry_kind: ResourceKind) -> Self {
        Self {
            values: UnitMap::default(),
            sources: UnitMap::default(),
            entry_path: entry_path.into(),
            entry_kind,
            diagnostics: Vec::new(),
            version: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    #[must_use]
    pub fn entry_path(&self) -> &str {
        &self.entry_path
    }

    #[must_use]
    pub fn entry_kind(&self) -> ResourceKind {
        self.entry_kind
    }

    /// Adds a unit to the "values" map.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::DuplicateUnit`] if either map already holds the path.
    pub fn insert_value(&mut self, unit: AstSource) -> Result<(), AstError> {
        self.check_unique(&unit)?;
        debug!(path = unit.full_name(), "adding value unit");
        self.values.push(unit);
        Ok(())
    }

    /// Adds a unit to the "sources" map.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::DuplicateUnit`] if either map already holds the path.
    pub fn insert_source(&mut self, unit: AstSource) -> Result<(), AstError> {
        self.check_unique(&unit)?;
        debug!(path = unit.full_name(), "adding source unit");
        self.sources.push(unit);
        Ok(())
    }

    /// Adds a unit to the map its resource kind belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::DuplicateUnit`] if either map already holds the path.
    pub fn insert(&mut self, unit: AstSource) -> Result<(), AstError> {
        if unit.resource_kind().is_value() {
            self.insert_value(unit)
        } else {
            self.insert_source(unit)
        }
    }

    fn check_unique(&self, unit: &AstSource) -> Result<(), AstError> {
        let path = unit.full_name();
        if self.values.contains(path) || self.sources.contains(path) {
            return Err(AstError::DuplicateUnit {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.values.contains(path) || self.sources.contains(path)
    }

    #[must_use]
    pub fn unit(&self, path: &str) -> Option<&AstSource> {
        self.values.get(path).or_else(|| self.sources.get(path))
    }

    pub fn unit_mut(&mut self, path: &str) -> Option<&mut AstSource> {
        if self.values.contains(path) {
            self.values.get_mut(path)
        } else {
            self.sources.get_mut(path)
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &AstSource> {
        self.values.units.iter()
    }

    pub fn sources(&self) -> impl Iterator<Item = &AstSource> {
        self.sources.units.iter()
    }

    /// All units, values first, each map in insertion order.
    pub fn units(&self) -> impl Iterator<Item = &AstSource> {
        self.values().chain(self.sources())
    }

    /// Paths of all units in traversal order.
    #[must_use]
    pub fn unit_paths(&self) -> Vec<String> {
        self.units().map(|unit| unit.full_name().to_string()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() + self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whole-program diagnostics only.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Per-unit diagnostics in traversal order, then the whole-program ones.
    pub fn all_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.units()
            .flat_map(AstSource::diagnostics)
            .chain(&self.diagnostics)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.all_diagnostics().any(Diagnostic::is_error)
    }

    /// Records a whole-program error when the entry unit is absent or its
    /// resource kind differs from the declared one. Returns `true` when the
    /// entry is present and matches. Repeated checks record the problem once.
    pub fn check_entry(&mut self) -> bool {
        let message = match self.unit(&self.entry_path) {
            None => format!("entry file `{}` is not part of the program", self.entry_path),
            Some(unit) if unit.resource_kind() != self.entry_kind => format!(
                "entry file `{}` is a {}, expected a {}",
                self.entry_path,
                unit.resource_kind(),
                self.entry_kind
            ),
            Some(_) => {
                debug!(entry = %self.entry_path, "entry file found");
                return true;
            }
        };
        debug!(entry = %self.entry_path, "entry check failed");
        let diagnostic = Diagnostic::error(message, None);
        if !self.diagnostics.contains(&diagnostic) {
            self.push_diagnostic(diagnostic);
        }
        false
    }
}
