//! Resolver configuration.
//!
//! Read from a TOML document with kebab-case keys; every key is optional:
//!
//! ```toml
//! builtins = ["print", "len"]
//! stop-at-first-unresolved = false
//! max-diagnostics-per-unit = 50
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read resolver config `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid resolver config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid resolver config: builtin name `{0}` is empty or contains whitespace")]
    InvalidBuiltin(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ResolverConfig {
    /// Names bound in the builtin namespace when nothing else declares them.
    pub builtins: Vec<String>,

    /// Stop walking a unit after its first resolution failure.
    pub stop_at_first_unresolved: bool,

    /// Record at most this many failures on one unit. Further failures are
    /// still counted in the report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_diagnostics_per_unit: Option<usize>,
}

impl ResolverConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys, and
    /// [`ConfigError::InvalidBuiltin`] for a builtin that is not a plain name.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ResolverConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise the
    /// errors of [`ResolverConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn with_builtins<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builtins.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn stop_at_first_unresolved(mut self, stop: bool) -> Self {
        self.stop_at_first_unresolved = stop;
        self
    }

    #[must_use]
    pub fn max_diagnostics_per_unit(mut self, cap: usize) -> Self {
        self.max_diagnostics_per_unit = Some(cap);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self
            .builtins
            .iter()
            .find(|name| name.is_empty() || name.chars().any(char::is_whitespace))
        {
            Some(name) => Err(ConfigError::InvalidBuiltin(name.clone())),
            None => Ok(()),
        }
    }
}
