//! Variable definitions - the typed values scopes expose to dialogue conditions.

mod table;

pub use table::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::ActorId;
use crate::error::RulesError;

/// Stable identifier for a variable.
///
/// Conditions look variables up by [`Variable::name`]; the id only survives
/// renames in authored content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableId(pub String);

impl VariableId {
    /// Create a new random variable ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for VariableId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a variable. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    Int,
    Float,
    Bool,
    String,
    ActorRef,
    Enum,
    Object,
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VariableKind::Int => "int",
            VariableKind::Float => "float",
            VariableKind::Bool => "bool",
            VariableKind::String => "string",
            VariableKind::ActorRef => "actor",
            VariableKind::Enum => "enum",
            VariableKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// An enumeration value: the declared options and the selected one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub options: Vec<String>,
    pub selected: usize,
}

impl EnumValue {
    /// Create an enum value selecting `selected` among `options`.
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>, selected: usize) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            selected,
        }
    }

    /// Name of the selected option, if the index is in range.
    pub fn selected_name(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }
}

/// A variable's current value. Exactly one representation is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum VariableValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    ActorRef(ActorId),
    Enum(EnumValue),
    /// Opaque handle owned by the host application.
    Object(serde_json::Value),
}

impl VariableValue {
    /// Get the kind of this value.
    pub fn kind(&self) -> VariableKind {
        match self {
            VariableValue::Int(_) => VariableKind::Int,
            VariableValue::Float(_) => VariableKind::Float,
            VariableValue::Bool(_) => VariableKind::Bool,
            VariableValue::String(_) => VariableKind::String,
            VariableValue::ActorRef(_) => VariableKind::ActorRef,
            VariableValue::Enum(_) => VariableKind::Enum,
            VariableValue::Object(_) => VariableKind::Object,
        }
    }
}

/// A named, typed variable living in a [`VariableTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub id: VariableId,
    pub name: String,
    value: VariableValue,
}

impl Variable {
    /// Create a new variable with a fresh id.
    pub fn new(name: impl Into<String>, value: VariableValue) -> Self {
        Self {
            id: VariableId::new(),
            name: name.into(),
            value,
        }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, VariableValue::Int(value))
    }

    pub fn float(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, VariableValue::Float(value))
    }

    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, VariableValue::Bool(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, VariableValue::String(value.into()))
    }

    /// Set a specific id (useful when loading authored content).
    pub fn with_id(mut self, id: VariableId) -> Self {
        self.id = id;
        self
    }

    /// The current value.
    pub fn value(&self) -> &VariableValue {
        &self.value
    }

    /// The kind of this variable.
    pub fn kind(&self) -> VariableKind {
        self.value.kind()
    }

    /// Replace the value, keeping the kind fixed.
    pub fn set(&mut self, value: VariableValue) -> Result<(), RulesError> {
        if value.kind() != self.kind() {
            return Err(RulesError::KindMismatch {
                name: self.name.clone(),
                expected: self.kind(),
                found: value.kind(),
            });
        }
        self.value = value;
        Ok(())
    }
}
