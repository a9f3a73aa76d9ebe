//! Condition evaluation — dotted-path field resolution plus a closed
//! comparison-operator set.
//!
//! Evaluation is total: an absent field or a type mismatch resolves to a
//! branch outcome, never an error. The operator set is closed at decode time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use actions::data::{resolve_path, stringify};

/// Comparison applied by a condition step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
}

/// Configuration of a condition step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Dotted path into the data bag (`"task.assignee.name"`).
    pub field: String,
    pub operator: Operator,
    /// Right-hand side of the comparison. Ignored by `isEmpty`/`isNotEmpty`.
    #[serde(default)]
    pub value: Value,
}

/// Evaluate the condition against the data bag.
pub fn evaluate(condition: &ConditionConfig, data: &Map<String, Value>) -> bool {
    let actual = resolve_path(data, &condition.field);

    match condition.operator {
        Operator::Equals => actual.is_some_and(|v| *v == condition.value),
        Operator::NotEquals => actual.map_or(true, |v| *v != condition.value),
        Operator::Contains => {
            // String containment after string-coercion of both sides.
            actual.is_some_and(|v| stringify(v).contains(&stringify(&condition.value)))
        }
        Operator::GreaterThan => {
            actual.is_some_and(|v| ordering(v, &condition.value) == Some(std::cmp::Ordering::Greater))
        }
        Operator::LessThan => {
            actual.is_some_and(|v| ordering(v, &condition.value) == Some(std::cmp::Ordering::Less))
        }
        Operator::IsEmpty => is_empty(actual),
        Operator::IsNotEmpty => !is_empty(actual),
    }
}

/// Absent, null, and the empty string count as empty; everything else does
/// not (zero and false are values).
fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Native ordering: numbers compare numerically, strings lexicographically.
/// Mixed or non-orderable types do not order.
fn ordering(lhs: &Value, rhs: &Value) -> Option<std::cmp::Ordering> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}
