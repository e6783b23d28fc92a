//! Name tables built before any identifier is bound.
//!
//! [`ProgramSymbols`] holds one [`ModuleSymbols`] per unit: its top-level
//! declarations, the names it exports and the names it imports. Lexical
//! scopes inside a unit are tracked separately by [`ScopeStack`] while the
//! unit is walked.

use quill_ast::{Binding, DeclarationRef, Location, NamespaceRef};
use rustc_hash::{FxHashMap, FxHashSet};

/// Path used in the declaration of builtin names.
pub const BUILTIN_PATH: &str = "<builtin>";

/// A name imported into a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportedName {
    /// Unit the name comes from.
    pub(crate) module: String,
    /// Declaration site in that unit.
    pub(crate) location: Location,
}

#[derive(Debug, Default)]
pub(crate) struct ModuleSymbols {
    pub(crate) declarations: FxHashMap<String, Location>,
    pub(crate) exports: FxHashSet<String>,
    pub(crate) imports: FxHashMap<String, Vec<ImportedName>>,
}

impl ModuleSymbols {
    /// Returns the earlier declaration if `name` is already declared.
    pub(crate) fn declare(&mut self, name: &str, location: Location) -> Result<(), Location> {
        match self.declarations.get(name) {
            Some(previous) => Err(*previous),
            None => {
                self.declarations.insert(name.to_string(), location);
                Ok(())
            }
        }
    }

    pub(crate) fn add_import(&mut self, name: &str, imported: ImportedName) {
        let entries = self.imports.entry(name.to_string()).or_default();
        if !entries.contains(&imported) {
            entries.push(imported);
        }
    }

    /// Exported declaration site of `name`, if any.
    #[must_use = "this is a pure lookup with no side effects"]
    pub(crate) fn exported(&self, name: &str) -> Option<Location> {
        if self.exports.contains(name) {
            self.declarations.get(name).copied()
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ProgramSymbols {
    modules: FxHashMap<String, ModuleSymbols>,
    builtins: FxHashSet<String>,
}

impl ProgramSymbols {
    pub(crate) fn new(builtins: &[String]) -> Self {
        Self {
            modules: FxHashMap::default(),
            builtins: builtins.iter().cloned().collect(),
        }
    }

    pub(crate) fn module_mut(&mut self, path: &str) -> &mut ModuleSymbols {
        self.modules.entry(path.to_string()).or_default()
    }

    #[must_use = "this is a pure lookup with no side effects"]
    pub(crate) fn module(&self, path: &str) -> Option<&ModuleSymbols> {
        self.modules.get(path)
    }

    #[must_use = "this is a pure lookup with no side effects"]
    pub(crate) fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(name)
    }
}

/// One lexical scope opened by a block.
#[derive(Debug)]
struct LocalScope {
    id: u32,
    names: FxHashMap<String, Location>,
}

/// Lexical scopes of the unit being walked, innermost last.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    scopes: Vec<LocalScope>,
    next_scope_id: u32,
}

impl ScopeStack {
    pub(crate) fn push_scope(&mut self) -> u32 {
        let id = self.next_scope_id;
        self.next_scope_id += 1;
        self.scopes.push(LocalScope {
            id,
            names: FxHashMap::default(),
        });
        id
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    #[must_use]
    pub(crate) fn is_top_level(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Declares `name` in the innermost scope and returns that scope's id.
    /// Returns the earlier declaration if the scope already holds the name.
    pub(crate) fn declare(&mut self, name: &str, location: Location) -> Result<u32, Location> {
        let Some(scope) = self.scopes.last_mut() else {
            return Err(location);
        };
        if let Some(previous) = scope.names.get(name) {
            return Err(*previous);
        }
        scope.names.insert(name.to_string(), location);
        Ok(scope.id)
    }

    /// Innermost scope declaring `name`.
    #[must_use = "this is a pure lookup with no side effects"]
    pub(crate) fn lookup(&self, name: &str) -> Option<(u32, Location)> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(name).map(|location| (scope.id, *location)))
    }
}

pub(crate) fn binding(namespace: NamespaceRef, path: &str, name: &str, location: Location) -> Binding {
    Binding {
        namespace,
        declaration: DeclarationRef {
            path: path.to_string(),
            name: name.to_string(),
            location,
        },
    }
}
