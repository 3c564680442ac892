//! Policies: tags an actor follows, tested by membership in conditions.

use serde::{Deserialize, Serialize};

/// Identifier of a policy as written in authored content (e.g. `"Pacifist"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(pub String);

impl From<&str> for PolicyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PolicyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog entry describing a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Policy {
    pub fn new(id: impl Into<PolicyId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
