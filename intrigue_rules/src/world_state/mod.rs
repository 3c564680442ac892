//! Intrigue state - the structure holding every actor, scheme and global variable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::{Actor, ActorId, Scheme, SchemeId};
use crate::error::RulesError;
use crate::policy::{Policy, PolicyId};
use crate::variables::VariableTable;

/// The complete intrigue state at any point in time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntrigueState {
    /// Process-wide variable pool (the "global" scope).
    pub global_variables: VariableTable,

    /// All actors in the world.
    pub actors: HashMap<ActorId, Actor>,

    /// Schemes currently in progress.
    pub schemes: HashMap<SchemeId, Scheme>,

    /// Known policies.
    pub policies: HashMap<PolicyId, Policy>,
}

impl IntrigueState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load authored state from a TOML document.
    ///
    /// Schemes name their conspirator and target by actor name; every name
    /// must match an actor declared in the same document.
    pub fn from_toml_str(source: &str) -> Result<Self, RulesError> {
        let definition: IntrigueDefinition = toml::from_str(source)?;
        definition.build()
    }

    /// Get actor by ID.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Get mutable actor by ID.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Find an actor by name.
    pub fn actor_by_name(&self, name: &str) -> Option<&Actor> {
        self.actors.values().find(|a| a.name == name)
    }

    /// Get scheme by ID.
    pub fn scheme(&self, id: SchemeId) -> Option<&Scheme> {
        self.schemes.get(&id)
    }

    /// Get mutable scheme by ID.
    pub fn scheme_mut(&mut self, id: SchemeId) -> Option<&mut Scheme> {
        self.schemes.get_mut(&id)
    }

    /// Find a scheme by name.
    pub fn scheme_by_name(&self, name: &str) -> Option<&Scheme> {
        self.schemes.values().find(|s| s.name == name)
    }

    /// Get a policy from the catalog.
    pub fn policy(&self, id: &PolicyId) -> Option<&Policy> {
        self.policies.get(id)
    }

    /// All schemes an actor takes part in.
    pub fn schemes_involving(&self, actor: ActorId) -> Vec<&Scheme> {
        self.schemes.values().filter(|s| s.involves(actor)).collect()
    }

    /// Add an actor to the world.
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        let id = actor.id;
        self.actors.insert(id, actor);
        id
    }

    /// Start tracking a scheme.
    pub fn add_scheme(&mut self, scheme: Scheme) -> SchemeId {
        let id = scheme.id;
        self.schemes.insert(id, scheme);
        id
    }

    /// Register a policy in the catalog.
    pub fn add_policy(&mut self, policy: Policy) {
        self.policies.insert(policy.id.clone(), policy);
    }
}

/// Authored form of [`IntrigueState`], as written in TOML.
#[derive(Debug, Deserialize)]
struct IntrigueDefinition {
    #[serde(default)]
    globals: VariableTable,
    #[serde(default)]
    policies: Vec<Policy>,
    #[serde(default)]
    actors: Vec<Actor>,
    #[serde(default)]
    schemes: Vec<SchemeDefinition>,
}

#[derive(Debug, Deserialize)]
struct SchemeDefinition {
    name: String,
    conspirator: String,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    variables: VariableTable,
}

impl IntrigueDefinition {
    fn build(self) -> Result<IntrigueState, RulesError> {
        let mut state = IntrigueState::new();
        state.global_variables = self.globals;

        for policy in self.policies {
            state.add_policy(policy);
        }
        for actor in self.actors {
            state.add_actor(actor);
        }

        for definition in self.schemes {
            let conspirator = actor_id_by_name(&state, &definition.conspirator)?;
            let mut scheme = Scheme::new(definition.name, conspirator);
            if let Some(target) = definition.target {
                scheme.target = Some(actor_id_by_name(&state, &target)?);
            }
            scheme.variables = definition.variables;
            state.add_scheme(scheme);
        }

        Ok(state)
    }
}

fn actor_id_by_name(state: &IntrigueState, name: &str) -> Result<ActorId, RulesError> {
    state
        .actor_by_name(name)
        .map(|a| a.id)
        .ok_or_else(|| RulesError::UnknownActor(name.to_string()))
}
