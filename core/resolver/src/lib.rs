#![warn(clippy::pedantic)]
//! Reference name resolver for Quill.
//!
//! Binds every identifier of an [`AstCompilation`] to the declaration it
//! refers to, through the identifiers' deferred-binding cells. Problems in
//! the program are recorded as diagnostics on the owning unit (or on the
//! compilation for whole-program problems); they never abort the pass.
//!
//! ## Lookup order
//!
//! 1. local scopes opened by blocks, innermost first (skipped for marked and
//!    non-local identifiers)
//! 2. top-level declarations of the unit
//! 3. names imported into the unit
//! 4. configured builtins
//!
//! A name found both at the top level and among the imports, or imported
//! from two different modules, is ambiguous and stays unbound.
//!
//! ## Quick Start
//!
//! ```ignore
//! use quill_resolver::{ResolverBuilder, ResolverConfig};
//!
//! let config = ResolverConfig::from_toml_str(r#"builtins = ["print"]"#)?;
//! let report = ResolverBuilder::new()
//!     .with_config(config)
//!     .resolve(&mut compilation)?
//!     .report();
//! assert_eq!(report.unresolved, 0);
//! ```

use std::{marker::PhantomData, path::Path};

use anyhow::Context;
use quill_ast::AstCompilation;

use crate::resolver::Resolver;

pub mod config;
pub mod errors;
mod resolver;
mod symbol_table;

pub use config::{ConfigError, ResolverConfig};
pub use errors::{ResolveError, ResolveErrorKind};
pub use symbol_table::BUILTIN_PATH;

/// Outcome of one resolver pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Identifiers bound by this pass.
    pub bound: usize,
    /// Identifiers left unbound by a resolution failure, including failures
    /// over the per-unit diagnostic cap.
    pub unresolved: usize,
    /// Paths of units resolved after the pass, in traversal order.
    pub resolved_units: Vec<String>,
    /// Paths of units that still have failures, in traversal order.
    pub unresolved_units: Vec<String>,
}

impl ResolutionReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved == 0 && self.unresolved_units.is_empty()
    }
}

/// Marker state indicating the resolver has not run yet.
#[derive(Debug)]
pub struct ResolverInitState;

/// Marker state indicating the resolver ran and its report is ready.
#[derive(Debug)]
pub struct ResolverCompleteState;

pub type CompletedResolverBuilder = ResolverBuilder<ResolverCompleteState>;

/// Builder running the resolver over a compilation.
///
/// Uses the typestate pattern so the report can only be taken after the pass
/// has run.
#[derive(Debug)]
pub struct ResolverBuilder<S> {
    config: ResolverConfig,
    report: ResolutionReport,
    _state: PhantomData<S>,
}

impl Default for ResolverBuilder<ResolverInitState> {
    fn default() -> Self {
        ResolverBuilder::new()
    }
}

impl ResolverBuilder<ResolverInitState> {
    #[must_use]
    pub fn new() -> Self {
        ResolverBuilder {
            config: ResolverConfig::default(),
            report: ResolutionReport::default(),
            _state: PhantomData,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn with_config_file(self, path: &Path) -> anyhow::Result<Self> {
        let config = ResolverConfig::load(path)
            .with_context(|| format!("loading resolver config from {}", path.display()))?;
        Ok(self.with_config(config))
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Runs the pass over `compilation` and returns a completed builder.
    ///
    /// Units already resolved are skipped. Units without failures are marked
    /// resolved; the others keep their diagnostics and stay unresolved.
    ///
    /// # Errors
    ///
    /// Returns an error only if the compilation breaks the unit lifecycle,
    /// never for problems in the program being resolved.
    #[must_use = "returns builder with the report, extract with .report()"]
    pub fn resolve(
        self,
        compilation: &mut AstCompilation,
    ) -> anyhow::Result<ResolverBuilder<ResolverCompleteState>> {
        let report = Resolver::new(&self.config).run(compilation)?;
        Ok(ResolverBuilder {
            config: self.config,
            report,
            _state: PhantomData,
        })
    }
}

impl ResolverBuilder<ResolverCompleteState> {
    /// Consume the builder and return the report.
    #[must_use = "consumes builder and returns the report"]
    pub fn report(self) -> ResolutionReport {
        self.report
    }
}

/// Resolves `compilation` with the default configuration.
///
/// # Errors
///
/// See [`ResolverBuilder::resolve`].
pub fn resolve(compilation: &mut AstCompilation) -> anyhow::Result<ResolutionReport> {
    Ok(ResolverBuilder::new().resolve(compilation)?.report())
}
