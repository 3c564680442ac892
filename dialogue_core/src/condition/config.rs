//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scope::ScopeKind;

/// Text substituted for a template directive that could not be evaluated
/// (missing variable or unparseable operand), per scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub global: String,
    pub table: String,
    pub conspirator: String,
    pub target: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            global: "NULL".to_string(),
            table: String::new(),
            conspirator: String::new(),
            target: String::new(),
        }
    }
}

impl Placeholders {
    pub fn for_scope(&self, kind: ScopeKind) -> &str {
        match kind {
            ScopeKind::Global => &self.global,
            ScopeKind::Table => &self.table,
            ScopeKind::Conspirator => &self.conspirator,
            ScopeKind::Target => &self.target,
        }
    }
}

/// Configuration for the condition engine.
///
/// The defaults reproduce the behavior authored dialogue relies on; a TOML
/// document only needs to list the settings it changes:
///
/// ```toml
/// collapse_blank_lines = false
///
/// [placeholders]
/// global = ""
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub placeholders: Placeholders,

    /// Collapse 3+ blank lines into one and trim leading/trailing newlines
    /// after rendering.
    pub collapse_blank_lines: bool,

    /// Turn literal `\n` sequences in substituted text into newlines.
    pub unescape_newlines: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholders: Placeholders::default(),
            collapse_blank_lines: true,
            unescape_newlines: true,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from TOML, filling unspecified settings with defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}
