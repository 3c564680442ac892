//! Comparison parsing and evaluation for directive payloads.
//!
//! A payload is either a value comparison such as `gold>=10`, or (for the
//! conspirator and target scopes) a policy check such as `HasPolicy==Pacifist`
//! or `!HasPolicy==Pacifist`.

use intrigue_rules::{Variable, VariableValue};

use crate::error::ConditionError;
use crate::scope::{Scope, ScopeKind};

const HAS_POLICY: &str = "HasPolicy";
const NOT_HAS_POLICY: &str = "!HasPolicy";

/// Comparison operators. `>>` and `<<` are the strict forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
}

impl Operator {
    /// The order operators are searched for in a payload.
    pub const PRECEDENCE: [Operator; 6] = [
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::LessOrEqual,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Operator::Greater => ">>",
            Operator::GreaterOrEqual => ">=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<<",
            Operator::LessOrEqual => "<=",
        }
    }

    /// Apply the operator. Float equality is exact.
    pub fn apply<T: PartialOrd>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            Operator::Greater => lhs > rhs,
            Operator::GreaterOrEqual => lhs >= rhs,
            Operator::Equal => lhs == rhs,
            Operator::NotEqual => lhs != rhs,
            Operator::Less => lhs < rhs,
            Operator::LessOrEqual => lhs <= rhs,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Whether a payload is a value comparison or a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionClass {
    Value,
    Policy,
}

/// A parsed payload, borrowing from the directive text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
    Compare {
        name: &'a str,
        operator: Operator,
        operand: &'a str,
    },
    Policy {
        negated: bool,
        policy: &'a str,
    },
}

impl std::fmt::Display for Condition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Compare {
                name,
                operator,
                operand,
            } => write!(f, "{name}{operator}{operand}"),
            Condition::Policy { negated, policy } => {
                let check = if *negated { NOT_HAS_POLICY } else { HAS_POLICY };
                write!(f, "{check}=={policy}")
            }
        }
    }
}

/// Classify a payload without parsing it fully.
pub fn classify(payload: &str, scope: ScopeKind) -> ConditionClass {
    let trimmed = payload.trim_start();
    if scope.has_policies() && (trimmed.starts_with(HAS_POLICY) || trimmed.starts_with(NOT_HAS_POLICY)) {
        ConditionClass::Policy
    } else {
        ConditionClass::Value
    }
}

/// Parse a directive payload.
///
/// Policy checks are recognized first (conspirator and target scopes only).
/// Otherwise the variable name is the leading run of word characters and the
/// first operator found in [`Operator::PRECEDENCE`] order splits off the operand.
pub fn parse(payload: &str, scope: ScopeKind) -> Result<Condition<'_>, ConditionError> {
    let unrecognized = || ConditionError::UnrecognizedOperator(payload.to_string());
    let trimmed = payload.trim_start();

    if classify(payload, scope) == ConditionClass::Policy {
        let (negated, rest) = match trimmed.strip_prefix(NOT_HAS_POLICY) {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix(HAS_POLICY).unwrap_or(trimmed)),
        };
        let policy = rest.trim_start().strip_prefix("==").ok_or_else(unrecognized)?;
        return Ok(Condition::Policy {
            negated,
            policy: policy.trim(),
        });
    }

    let (operator, at) = Operator::PRECEDENCE
        .into_iter()
        .find_map(|op| trimmed.find(op.token()).map(|at| (op, at)))
        .ok_or_else(unrecognized)?;

    let name_len = trimmed
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());

    Ok(Condition::Compare {
        name: &trimmed[..name_len],
        operator,
        operand: trimmed[at + operator.token().len()..].trim(),
    })
}

/// Evaluate a parsed condition against a scope.
///
/// Returns `Err(UnrecognizedOperator)` for comparisons that have no meaning
/// for the variable's kind; callers treat those as no-ops.
pub fn evaluate(
    condition: &Condition<'_>,
    kind: ScopeKind,
    scope: &dyn Scope,
) -> Result<bool, ConditionError> {
    match *condition {
        Condition::Policy { negated, policy } => Ok(scope.has_policy(policy) != negated),
        Condition::Compare {
            name,
            operator,
            operand,
        } => {
            let variable = scope
                .resolve(name)
                .ok_or_else(|| ConditionError::VariableNotFound {
                    scope: kind,
                    name: name.to_string(),
                })?;
            compare(variable, operator, operand)
                .map_err(|error| match error {
                    ConditionError::UnrecognizedOperator(_) => {
                        ConditionError::UnrecognizedOperator(condition.to_string())
                    }
                    other => other,
                })
        }
    }
}

fn compare(variable: &Variable, operator: Operator, operand: &str) -> Result<bool, ConditionError> {
    let invalid = || ConditionError::InvalidComparisonSyntax {
        name: variable.name.clone(),
        kind: variable.kind(),
        literal: operand.to_string(),
    };

    match variable.value() {
        VariableValue::Int(value) => {
            let rhs: i64 = operand.parse().map_err(|_| invalid())?;
            Ok(operator.apply(value, &rhs))
        }
        VariableValue::Float(value) => {
            let rhs: f64 = operand.parse().map_err(|_| invalid())?;
            Ok(operator.apply(value, &rhs))
        }
        VariableValue::Bool(value) => match operator {
            Operator::Equal | Operator::NotEqual => {
                let rhs = parse_bool(operand).ok_or_else(invalid)?;
                Ok(operator.apply(value, &rhs))
            }
            _ => Err(ConditionError::UnrecognizedOperator(String::new())),
        },
        VariableValue::String(_)
        | VariableValue::ActorRef(_)
        | VariableValue::Enum(_)
        | VariableValue::Object(_) => Err(ConditionError::UnrecognizedOperator(String::new())),
    }
}

fn parse_bool(literal: &str) -> Option<bool> {
    if literal.eq_ignore_ascii_case("true") {
        Some(true)
    } else if literal.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
