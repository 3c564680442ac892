//! Scheme instances.

use serde::{Deserialize, Serialize};

use super::{ActorId, SchemeId};
use crate::variables::{Variable, VariableTable};

/// An in-progress instance of an authored intrigue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheme {
    #[serde(default)]
    pub id: SchemeId,
    pub name: String,
    pub conspirator: ActorId,
    #[serde(default)]
    pub target: Option<ActorId>,

    /// Scheme-local variables (the "table" scope of dialogue conditions).
    #[serde(default)]
    pub variables: VariableTable,
}

impl Scheme {
    /// Start a new scheme run by `conspirator`.
    pub fn new(name: impl Into<String>, conspirator: ActorId) -> Self {
        Self {
            id: SchemeId::new(),
            name: name.into(),
            conspirator,
            target: None,
            variables: VariableTable::new(),
        }
    }

    /// Set the scheme's target.
    pub fn with_target(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }

    /// Add a local variable.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.insert(variable);
        self
    }

    /// Check whether an actor takes part in this scheme.
    pub fn involves(&self, actor: ActorId) -> bool {
        self.conspirator == actor || self.target == Some(actor)
    }
}
