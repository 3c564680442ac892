//! Variable tables - the storage behind every scope.

use serde::{Deserialize, Serialize};

use super::{Variable, VariableId, VariableValue};
use crate::error::RulesError;

/// An ordered collection of variables, looked up by name.
///
/// Used for the global pool, each scheme's local table and each actor's
/// own variables. Names are expected to be unique within a table; when they
/// are not, the first declaration wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableTable {
    variables: Vec<Variable>,
}

impl VariableTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the table.
    pub fn insert(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    /// Builder-style insert.
    pub fn with(mut self, variable: Variable) -> Self {
        self.insert(variable);
        self
    }

    /// Get a variable by name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Get a mutable variable by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.name == name)
    }

    /// Get a variable by id.
    pub fn get_by_id(&self, id: &VariableId) -> Option<&Variable> {
        self.variables.iter().find(|v| &v.id == id)
    }

    /// Assign a new value to the named variable.
    pub fn set(&mut self, name: &str, value: VariableValue) -> Result<(), RulesError> {
        self.get_mut(name)
            .ok_or_else(|| RulesError::UnknownVariable(name.to_string()))?
            .set(value)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over all variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }
}

impl FromIterator<Variable> for VariableTable {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_id() {
        let favor = Variable::int("favor", 3);
        let favor_id = favor.id.clone();
        let table = VariableTable::new()
            .with(favor)
            .with(Variable::bool("betrayed", false));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("favor").map(|v| v.value()), Some(&VariableValue::Int(3)));
        assert_eq!(table.get_by_id(&favor_id).map(|v| v.name.as_str()), Some("favor"));
        assert!(table.get("Favor").is_none());
    }

    #[test]
    fn test_set_unknown_variable() {
        let mut table = VariableTable::new();
        let err = table.set("missing", VariableValue::Int(1)).unwrap_err();
        assert!(matches!(err, RulesError::UnknownVariable(name) if name == "missing"));
    }

    #[test]
    fn test_set_respects_kind() {
        let mut table: VariableTable = [Variable::float("suspicion", 0.25)].into_iter().collect();

        table.set("suspicion", VariableValue::Float(0.75)).unwrap();
        assert_eq!(
            table.get("suspicion").map(|v| v.value()),
            Some(&VariableValue::Float(0.75))
        );
        assert!(table.set("suspicion", VariableValue::Int(1)).is_err());
    }

    #[test]
    fn test_first_declaration_wins() {
        let table = VariableTable::new()
            .with(Variable::int("rank", 1))
            .with(Variable::int("rank", 2));

        assert_eq!(table.get("rank").map(|v| v.value()), Some(&VariableValue::Int(1)));
    }
}
