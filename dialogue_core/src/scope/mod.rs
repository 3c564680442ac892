//! Scopes - where the variables named by a directive live.
//!
//! Four scopes are addressable from dialogue text, each selected by the
//! directive's marker character:
//! - **Global** (`!`): the process-wide variable pool
//! - **Table** (`#`): the running scheme's local variables
//! - **Conspirator** (`$`): the acting actor's variables and policies
//! - **Target** (`&`): the acted-upon actor's variables and policies

use intrigue_rules::{Actor, IntrigueState, Scheme, Variable, VariableTable};
use serde::{Deserialize, Serialize};

/// Which scope a directive addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    Global,
    Table,
    Conspirator,
    Target,
}

impl ScopeKind {
    /// All scope kinds, in the order directives are rendered.
    pub const ALL: [ScopeKind; 4] = [
        ScopeKind::Global,
        ScopeKind::Table,
        ScopeKind::Conspirator,
        ScopeKind::Target,
    ];

    /// The marker character that prefixes `if[...]` for this scope.
    pub fn marker(self) -> char {
        match self {
            ScopeKind::Global => '!',
            ScopeKind::Table => '#',
            ScopeKind::Conspirator => '$',
            ScopeKind::Target => '&',
        }
    }

    /// Look a scope up by its marker character.
    pub fn from_marker(marker: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.marker() == marker)
    }

    /// Whether `HasPolicy` checks are recognized for this scope.
    pub fn has_policies(self) -> bool {
        matches!(self, ScopeKind::Conspirator | ScopeKind::Target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Table => "table",
            ScopeKind::Conspirator => "conspirator",
            ScopeKind::Target => "target",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to the variables (and policies) of one scope.
///
/// Lookups borrow; the engine never copies or mutates a scope.
pub trait Scope {
    /// Find a variable by its name.
    fn resolve(&self, name: &str) -> Option<&Variable>;

    /// Check membership of a policy. Scopes without an owning actor have none.
    fn has_policy(&self, _policy: &str) -> bool {
        false
    }
}

impl Scope for VariableTable {
    fn resolve(&self, name: &str) -> Option<&Variable> {
        self.get(name)
    }
}

impl Scope for Actor {
    fn resolve(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    fn has_policy(&self, policy: &str) -> bool {
        Actor::has_policy(self, policy)
    }
}

/// A scope with no variables and no policies.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScope;

impl Scope for EmptyScope {
    fn resolve(&self, _name: &str) -> Option<&Variable> {
        None
    }
}

/// Supplies the four scopes a piece of dialogue text is evaluated against.
pub trait ScopeProvider {
    fn scope(&self, kind: ScopeKind) -> &dyn Scope;
}

/// A [`ScopeProvider`] built from borrowed scopes.
///
/// Scopes that are not set behave as [`EmptyScope`].
#[derive(Clone, Copy)]
pub struct ScopeContext<'a> {
    global: &'a dyn Scope,
    table: &'a dyn Scope,
    conspirator: &'a dyn Scope,
    target: &'a dyn Scope,
}

impl<'a> ScopeContext<'a> {
    /// Create a context where every scope is empty.
    pub fn new() -> Self {
        Self {
            global: &EmptyScope,
            table: &EmptyScope,
            conspirator: &EmptyScope,
            target: &EmptyScope,
        }
    }

    /// Build the context a scheme's dialogue runs in.
    ///
    /// Conspirator and target are looked up in `state`; a missing actor
    /// (or a scheme without a target) leaves that scope empty.
    pub fn for_scheme(state: &'a IntrigueState, scheme: &'a Scheme) -> Self {
        let conspirator = state.actor(scheme.conspirator);
        if conspirator.is_none() {
            tracing::debug!(scheme = %scheme.name, actor = %scheme.conspirator, "conspirator not found");
        }
        let target = scheme.target.and_then(|id| state.actor(id));

        Self::new()
            .with_global(&state.global_variables)
            .with_table(&scheme.variables)
            .with_conspirator_opt(conspirator)
            .with_target_opt(target)
    }

    pub fn with_global(mut self, scope: &'a dyn Scope) -> Self {
        self.global = scope;
        self
    }

    pub fn with_table(mut self, scope: &'a dyn Scope) -> Self {
        self.table = scope;
        self
    }

    pub fn with_conspirator(mut self, scope: &'a dyn Scope) -> Self {
        self.conspirator = scope;
        self
    }

    pub fn with_target(mut self, scope: &'a dyn Scope) -> Self {
        self.target = scope;
        self
    }

    fn with_conspirator_opt(self, actor: Option<&'a Actor>) -> Self {
        match actor {
            Some(actor) => self.with_conspirator(actor),
            None => self,
        }
    }

    fn with_target_opt(self, actor: Option<&'a Actor>) -> Self {
        match actor {
            Some(actor) => self.with_target(actor),
            None => self,
        }
    }
}

impl Default for ScopeContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeProvider for ScopeContext<'_> {
    fn scope(&self, kind: ScopeKind) -> &dyn Scope {
        match kind {
            ScopeKind::Global => self.global,
            ScopeKind::Table => self.table,
            ScopeKind::Conspirator => self.conspirator,
            ScopeKind::Target => self.target,
        }
    }
}
