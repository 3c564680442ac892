//! Error types for condition evaluation and configuration loading.

use intrigue_rules::VariableKind;
use thiserror::Error;

use crate::scope::ScopeKind;

/// Why a single directive could not be evaluated.
///
/// None of these reach the caller of the engine: each one is logged,
/// recorded as a [`Diagnostic`](crate::condition::Diagnostic) and replaced
/// by a safe default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("variable '{name}' not found in {scope} scope")]
    VariableNotFound { scope: ScopeKind, name: String },

    #[error("cannot compare {kind} variable '{name}' against '{literal}'")]
    InvalidComparisonSyntax {
        name: String,
        kind: VariableKind,
        literal: String,
    },

    #[error("no comparison recognized in '{0}'")]
    UnrecognizedOperator(String),
}

/// Errors raised while loading TOML documents (engine settings, dialogue patterns).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
