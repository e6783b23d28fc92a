//! Resolver implementation.
//!
//! The pass runs in four phases over the whole program:
//!
//! 1. **collect** - top-level declarations and export lists of every unit
//! 2. **bind imports** - imported names are checked against the target's
//!    export list and bound to the exported declaration
//! 3. **walk** - every unresolved unit is walked with [`UnitWalker`], which
//!    binds each identifier it meets
//! 4. **finish** - failures are recorded on their units and clean units are
//!    marked resolved
//!
//! Phases 1 to 3 only read the compilation; bindings are stored through the
//! identifiers' deferred-binding cells. Phase 4 is the only one that needs
//! exclusive access.

use anyhow::Context;
use quill_ast::{
    AstCompilation, AstSource, Binding, Diagnostic, Location, NamespaceRef, Node, Visitable,
    Visitor,
    nodes::{
        AwaitExpr, BlockStatement, BooleanLiteral, CommaExpr, EmptyStatement, ExportDecl,
        FloatLiteral, GroupExpr, IdentifierExpr, ImportDecl, InOfExpr, IntegerLiteral,
        ListLiteral, ListType, NamedType, NullLiteral, NullableType, SpreadExpr,
        StringInterpolation, StringLiteral, VarDecl,
    },
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::{
    ResolutionReport,
    config::ResolverConfig,
    errors::{Candidate, ResolveError, ResolveErrorKind},
    symbol_table::{BUILTIN_PATH, ImportedName, ProgramSymbols, ScopeStack, binding},
};

pub(crate) struct Resolver<'c> {
    config: &'c ResolverConfig,
    symbols: ProgramSymbols,
    /// Failures per unit path, in the order they were found.
    pending: FxHashMap<String, Vec<ResolveError>>,
    /// Units that import from a module missing from the program.
    cross_file_failures: FxHashSet<String>,
    program_errors: Vec<ResolveError>,
    bound: usize,
    unresolved: usize,
}

impl<'c> Resolver<'c> {
    pub(crate) fn new(config: &'c ResolverConfig) -> Self {
        Self {
            config,
            symbols: ProgramSymbols::new(&config.builtins),
            pending: FxHashMap::default(),
            cross_file_failures: FxHashSet::default(),
            program_errors: Vec::new(),
            bound: 0,
            unresolved: 0,
        }
    }

    pub(crate) fn run(mut self, compilation: &mut AstCompilation) -> anyhow::Result<ResolutionReport> {
        debug!(units = compilation.len(), "resolving program");
        compilation.check_entry();

        self.collect(compilation);
        self.bind_imports(compilation);
        self.walk_units(compilation);
        self.finish(compilation)
    }

    fn fail(&mut self, path: &str, error: ResolveError) {
        self.pending.entry(path.to_string()).or_default().push(error);
    }

    fn collect(&mut self, compilation: &AstCompilation) {
        debug!("collecting top-level declarations");
        for unit in compilation.units() {
            let path = unit.full_name();
            let mut duplicates = Vec::new();
            let module = self.symbols.module_mut(path);
            for node in unit.nodes() {
                if let Node::VarDecl(decl) = node
                    && let Err(previous) = module.declare(&decl.name.name, decl.name.location)
                {
                    duplicates.push(ResolveError::new(
                        ResolveErrorKind::DuplicateDeclaration {
                            name: decl.name.name.clone(),
                            previous,
                        },
                        decl.name.location,
                    ));
                }
            }
            for node in unit.imports().iter().chain(unit.nodes()) {
                if let Node::Export(export) = node {
                    module
                        .exports
                        .extend(export.names.iter().map(|name| name.name.clone()));
                }
            }
            if !unit.is_resolved() {
                self.unresolved += duplicates.len();
                for error in duplicates {
                    self.fail(path, error);
                }
            }
        }
    }

    fn bind_imports(&mut self, compilation: &AstCompilation) {
        debug!("binding imports");
        for unit in compilation.units().filter(|unit| !unit.is_resolved()) {
            let path = unit.full_name();
            for node in unit.imports().iter().chain(unit.nodes()) {
                if let Node::Import(import) = node {
                    self.bind_import(compilation, path, import);
                }
            }
        }
    }

    fn bind_import(&mut self, compilation: &AstCompilation, importer: &str, import: &ImportDecl) {
        let target = match self.symbols.module(&import.path) {
            Some(target) if compilation.contains(&import.path) => target,
            _ => {
                debug!(importer, module = %import.path, "import of unknown module");
                self.unresolved += import.names.len();
                self.cross_file_failures.insert(importer.to_string());
                self.program_errors.push(ResolveError::new(
                    ResolveErrorKind::UnknownModule {
                        path: import.path.clone(),
                        importer: importer.to_string(),
                    },
                    import.location,
                ));
                return;
            }
        };

        let mut found = Vec::new();
        let mut missing = Vec::new();
        for name in &import.names {
            match target.exported(&name.name) {
                Some(location) => found.push((name, location)),
                None => missing.push(name),
            }
        }

        for name in missing {
            trace!(importer, name = %name.name, module = %import.path, "name is not exported");
            self.unresolved += 1;
            self.fail(
                importer,
                ResolveError::new(
                    ResolveErrorKind::NotExported {
                        name: name.name.clone(),
                        module: import.path.clone(),
                    },
                    name.location,
                ),
            );
        }

        for (name, location) in found {
            self.symbols.module_mut(importer).add_import(
                &name.name,
                ImportedName {
                    module: import.path.clone(),
                    location,
                },
            );
            if !name.is_bound() {
                let target_binding = binding(
                    NamespaceRef::Module(import.path.clone()),
                    &import.path,
                    &name.name,
                    location,
                );
                if store(name, target_binding) {
                    self.bound += 1;
                }
            }
        }
    }

    fn walk_units(&mut self, compilation: &AstCompilation) {
        debug!("walking units");
        for unit in compilation.units().filter(|unit| !unit.is_resolved()) {
            let path = unit.full_name();
            debug!(path, "walking unit");
            let mut walker = UnitWalker::new(self.config, &self.symbols, path);
            unit.accept(&mut walker);
            let UnitWalker {
                failures,
                bound,
                unresolved,
                pruned,
                ..
            } = walker;
            if pruned {
                debug!(path, "stopped at first unresolved identifier");
            }
            self.bound += bound;
            self.unresolved += unresolved;
            self.pending.entry(path.to_string()).or_default().extend(failures);
        }
    }

    fn finish(mut self, compilation: &mut AstCompilation) -> anyhow::Result<ResolutionReport> {
        debug!("recording results");
        let cap = self.config.max_diagnostics_per_unit.unwrap_or(usize::MAX);
        let mut report = ResolutionReport {
            bound: self.bound,
            unresolved: self.unresolved,
            ..ResolutionReport::default()
        };

        for path in compilation.unit_paths() {
            let Some(unit) = compilation.unit_mut(&path) else {
                continue;
            };
            if unit.is_resolved() {
                report.resolved_units.push(path);
                continue;
            }
            let mut errors = self.pending.remove(&path).unwrap_or_default();
            let failed = !errors.is_empty() || self.cross_file_failures.contains(&path);
            if errors.len() > cap {
                debug!(path = %path, recorded = cap, found = errors.len(), "diagnostic cap reached");
            }
            errors.sort_by_key(|error| error.location.offset);
            for error in errors.into_iter().take(cap) {
                let diagnostic = Diagnostic::from(error);
                // Already recorded by an earlier pass.
                if !unit.diagnostics().contains(&diagnostic) {
                    unit.push_diagnostic(diagnostic);
                }
            }
            if failed {
                report.unresolved_units.push(path);
            } else {
                mark_resolved(unit).with_context(|| format!("finishing unit `{path}`"))?;
                report.resolved_units.push(path);
            }
        }

        for error in self.program_errors {
            let diagnostic = Diagnostic::from(error);
            if !compilation.diagnostics().contains(&diagnostic) {
                compilation.push_diagnostic(diagnostic);
            }
        }
        debug!(
            bound = report.bound,
            unresolved = report.unresolved,
            "resolution finished"
        );
        Ok(report)
    }
}

fn mark_resolved(unit: &mut AstSource) -> anyhow::Result<()> {
    unit.mark_resolved()?;
    debug!(path = unit.full_name(), "unit resolved");
    Ok(())
}

/// Stores `binding` in `identifier`. Returns `false` if it was already bound.
fn store(identifier: &IdentifierExpr, binding: Binding) -> bool {
    match identifier.bind(binding) {
        Ok(()) => true,
        Err(error) => {
            trace!(%error, "keeping existing binding");
            false
        }
    }
}

/// Binds the identifiers of one unit.
///
/// Lexical scopes are kept on an explicit stack: a block pushes a scope for
/// the duration of its body, and a local declaration enters the innermost
/// scope once its initializer has been walked.
pub(crate) struct UnitWalker<'a> {
    config: &'a ResolverConfig,
    symbols: &'a ProgramSymbols,
    path: &'a str,
    scopes: ScopeStack,
    /// Top-level declaration whose initializer is being walked.
    initializing: Option<String>,
    failures: Vec<ResolveError>,
    bound: usize,
    unresolved: usize,
    pruned: bool,
}

impl<'a> UnitWalker<'a> {
    pub(crate) fn new(config: &'a ResolverConfig, symbols: &'a ProgramSymbols, path: &'a str) -> Self {
        Self {
            config,
            symbols,
            path,
            scopes: ScopeStack::default(),
            initializing: None,
            failures: Vec::new(),
            bound: 0,
            unresolved: 0,
            pruned: false,
        }
    }

    fn fail(&mut self, kind: ResolveErrorKind, location: Location) {
        trace!(path = self.path, %location, %kind, "resolution failure");
        self.failures.push(ResolveError::new(kind, location));
        self.unresolved += 1;
        if self.config.stop_at_first_unresolved {
            self.pruned = true;
        }
    }

    fn bind(&mut self, identifier: &IdentifierExpr, binding: Binding) {
        if store(identifier, binding) {
            self.bound += 1;
        }
    }

    fn descend<N: Visitable>(&mut self, node: &N) {
        if !self.pruned {
            node.traverse(self);
        }
    }

    fn resolve(&mut self, identifier: &IdentifierExpr) {
        let name = identifier.name.as_str();

        if identifier.is_local
            && !identifier.is_marked
            && let Some((scope, location)) = self.scopes.lookup(name)
        {
            self.bind(
                identifier,
                binding(NamespaceRef::Scope(scope), self.path, name, location),
            );
            return;
        }

        let symbols = self.symbols;
        let module = symbols.module(self.path);
        let declared = module.and_then(|module| module.declarations.get(name).copied());
        let imported: &[ImportedName] = module
            .and_then(|module| module.imports.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default();

        if (declared.is_some() && !imported.is_empty()) || imported.len() > 1 {
            let candidates = declared
                .map(|_| Candidate::Module)
                .into_iter()
                .chain(imported.iter().map(|i| Candidate::Import(i.module.clone())))
                .collect();
            self.fail(
                ResolveErrorKind::AmbiguousIdentifier {
                    name: name.to_string(),
                    candidates,
                },
                identifier.location,
            );
            return;
        }

        if let Some(location) = declared {
            if self.initializing.as_deref() == Some(name) {
                self.fail(
                    ResolveErrorKind::CircularReference {
                        name: name.to_string(),
                    },
                    identifier.location,
                );
            } else {
                self.bind(
                    identifier,
                    binding(NamespaceRef::Module(self.path.to_string()), self.path, name, location),
                );
            }
        } else if let [import] = imported {
            self.bind(
                identifier,
                binding(
                    NamespaceRef::Module(import.module.clone()),
                    &import.module,
                    name,
                    import.location,
                ),
            );
        } else if symbols.is_builtin(name) {
            self.bind(
                identifier,
                binding(NamespaceRef::Builtin, BUILTIN_PATH, name, Location::default()),
            );
        } else {
            self.fail(
                ResolveErrorKind::UnknownIdentifier {
                    name: name.to_string(),
                },
                identifier.location,
            );
        }
    }

    fn declare_top_level(&mut self, name: &IdentifierExpr) {
        let declared = self
            .symbols
            .module(self.path)
            .and_then(|module| module.declarations.get(&name.name).copied());
        match declared {
            Some(location) if location == name.location => self.bind(
                name,
                binding(
                    NamespaceRef::Module(self.path.to_string()),
                    self.path,
                    &name.name,
                    location,
                ),
            ),
            // Duplicate; reported while collecting.
            Some(_) => {}
            None => self.fail(
                ResolveErrorKind::UnknownIdentifier {
                    name: name.name.clone(),
                },
                name.location,
            ),
        }
    }

    /// Exported names refer to a top-level declaration of the unit itself.
    fn resolve_export(&mut self, name: &IdentifierExpr) {
        let declared = self
            .symbols
            .module(self.path)
            .and_then(|module| module.declarations.get(&name.name).copied());
        match declared {
            Some(location) => self.bind(
                name,
                binding(
                    NamespaceRef::Module(self.path.to_string()),
                    self.path,
                    &name.name,
                    location,
                ),
            ),
            None => self.fail(
                ResolveErrorKind::UnknownIdentifier {
                    name: name.name.clone(),
                },
                name.location,
            ),
        }
    }

    fn declare_local(&mut self, name: &IdentifierExpr) {
        match self.scopes.declare(&name.name, name.location) {
            Ok(scope) => self.bind(
                name,
                binding(NamespaceRef::Scope(scope), self.path, &name.name, name.location),
            ),
            Err(previous) => self.fail(
                ResolveErrorKind::DuplicateDeclaration {
                    name: name.name.clone(),
                    previous,
                },
                name.location,
            ),
        }
    }
}

impl Visitor for UnitWalker<'_> {
    type Output = ();

    fn visit_empty(&mut self, _node: &EmptyStatement) {}

    fn visit_block(&mut self, node: &BlockStatement) {
        if self.pruned {
            return;
        }
        self.scopes.push_scope();
        self.descend(node);
        self.scopes.pop_scope();
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        if self.pruned {
            return;
        }
        let top_level = self.scopes.is_top_level();
        let outer = if top_level {
            self.initializing.replace(node.name.name.clone())
        } else {
            self.initializing.clone()
        };
        if let Some(initializer) = &node.initializer {
            initializer.accept(self);
        }
        self.initializing = outer;
        if self.pruned {
            return;
        }
        if top_level {
            if !node.name.is_bound() {
                self.declare_top_level(&node.name);
            }
        } else {
            // A name bound by an earlier pass still enters the scope.
            self.declare_local(&node.name);
        }
    }

    // Import names are bound before the walk.
    fn visit_import(&mut self, _node: &ImportDecl) {}

    fn visit_export(&mut self, node: &ExportDecl) {
        for name in &node.names {
            if self.pruned {
                return;
            }
            if !name.is_bound() {
                self.resolve_export(name);
            }
        }
    }

    fn visit_null(&mut self, _node: &NullLiteral) {}

    fn visit_boolean(&mut self, _node: &BooleanLiteral) {}

    fn visit_integer(&mut self, _node: &IntegerLiteral) {}

    fn visit_float(&mut self, _node: &FloatLiteral) {}

    fn visit_string(&mut self, _node: &StringLiteral) {}

    fn visit_interpolation(&mut self, node: &StringInterpolation) {
        self.descend(node);
    }

    fn visit_identifier(&mut self, node: &IdentifierExpr) {
        if !self.pruned && !node.is_bound() {
            self.resolve(node);
        }
    }

    fn visit_spread(&mut self, node: &SpreadExpr) {
        self.descend(node);
    }

    fn visit_comma(&mut self, node: &CommaExpr) {
        self.descend(node);
    }

    fn visit_list(&mut self, node: &ListLiteral) {
        self.descend(node);
    }

    fn visit_in_of(&mut self, node: &InOfExpr) {
        self.descend(node);
    }

    fn visit_group(&mut self, node: &GroupExpr) {
        self.descend(node);
    }

    fn visit_await(&mut self, node: &AwaitExpr) {
        self.descend(node);
    }

    // Type names are not bound by this pass.
    fn visit_named_type(&mut self, _node: &NamedType) {}

    fn visit_list_type(&mut self, _node: &ListType) {}

    fn visit_nullable_type(&mut self, _node: &NullableType) {}

    fn visit_source(&mut self, source: &AstSource) {
        self.descend(source);
    }

    fn visit_compilation(&mut self, compilation: &AstCompilation) {
        self.descend(compilation);
    }
}
