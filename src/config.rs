//! In-process configuration for an [`Autoloader`](crate::Autoloader).
//!
//! Embedding applications usually build an [`AutoloadConfig`] in code. When
//! they keep their search paths in their own TOML settings, the same struct
//! deserializes from a table shaped like:
//!
//! ```toml
//! extension = "svs"
//! probe = "first-match"
//!
//! [hook]
//! prepend = true
//!
//! [[paths]]
//! namespace = "Acme"
//! path = "vendor/acme/src"
//! priority = 10
//! ```

use crate::host::HookOptions;
use crate::registry::DEFAULT_PRIORITY;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Candidate file extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "svs";

/// Whether resolution stops at its first existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeMode {
    /// Load every existing candidate on every level down to the root.
    #[default]
    Exhaustive,
    /// Load only the winning file.
    FirstMatch,
}

/// A namespace registration applied at construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathRegistration {
    #[serde(default)]
    pub namespace: String,
    pub path: String,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl PathRegistration {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoloadConfig {
    /// Extension of candidate files, without the leading dot.
    pub extension: String,
    pub default_priority: i32,
    /// Write the trace block of each lookup to stdout.
    pub debug: bool,
    pub probe: ProbeMode,
    /// Register the root namespace with an empty directory, so bare relative
    /// names resolve against the working directory.
    pub working_dir_fallback: bool,
    pub hook: HookOptions,
    pub paths: Vec<PathRegistration>,
}

impl Default for AutoloadConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            default_priority: DEFAULT_PRIORITY,
            debug: false,
            probe: ProbeMode::default(),
            working_dir_fallback: true,
            hook: HookOptions::default(),
            paths: Vec::new(),
        }
    }
}

impl AutoloadConfig {
    /// Configuration with nothing pre-registered.
    pub fn empty() -> Self {
        Self {
            working_dir_fallback: false,
            ..Self::default()
        }
    }

    pub fn from_toml_str(data: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(data).context("parsing autoload configuration")?;
        config.extension = config.extension.trim_start_matches('.').to_string();
        Ok(config)
    }

    /// Read a configuration file. Relative registration paths stay relative
    /// to the process working directory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading autoload configuration from {}", path.display()))?;
        Self::from_toml_str(&data)
            .with_context(|| format!("parsing autoload configuration {}", path.display()))
    }

    pub fn register(mut self, registration: PathRegistration) -> Self {
        self.paths.push(registration);
        self
    }
}
