//! Error types for the intrigue data model.

use thiserror::Error;

use crate::variables::VariableKind;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("variable '{name}' is {expected}, cannot assign a {found} value")]
    KindMismatch {
        name: String,
        expected: VariableKind,
        found: VariableKind,
    },

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown actor '{0}'")]
    UnknownActor(String),

    #[error("invalid intrigue definition: {0}")]
    Toml(#[from] toml::de::Error),
}
