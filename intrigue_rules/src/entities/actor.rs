//! Actor definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ActorId;
use crate::policy::PolicyId;
use crate::variables::{Variable, VariableTable};

/// A character that can conspire or be targeted by a scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub id: ActorId,
    pub name: String,

    /// Actor-local variables.
    #[serde(default)]
    pub variables: VariableTable,

    /// Policies this actor follows.
    #[serde(default)]
    pub policies: HashSet<PolicyId>,
}

impl Actor {
    /// Create a new actor with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            variables: VariableTable::new(),
            policies: HashSet::new(),
        }
    }

    /// Add a variable to this actor.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.insert(variable);
        self
    }

    /// Add a policy to this actor.
    pub fn with_policy(mut self, policy: impl Into<PolicyId>) -> Self {
        self.policies.insert(policy.into());
        self
    }

    /// Check if the actor follows a specific policy.
    pub fn has_policy(&self, policy: &str) -> bool {
        self.policies.iter().any(|p| p.0 == policy)
    }
}
