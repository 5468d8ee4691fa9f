use crate::schema::{ConditionSource, StepCondition};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value types a condition can be evaluated against.
///
/// Untagged on the wire, so a context JSON file can use plain literals
/// (`"done"`, `34`, `true`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl Value {
    /// Canonical text rendering used for `equals`/`contains` comparisons.
    /// Whole numbers render without a fractional part, so a recorded `30.0`
    /// equals the literal `"30"`.
    pub fn as_text(&self) -> String {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Bool(b) => b.to_string(),
            Value::Text(s) => s.clone(),
            Value::Null => "null".to_string(),
        }
    }

    /// Numeric view for `gt`/`lt`. Text parses if it holds a number;
    /// booleans and null never coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Bool(_) | Value::Null => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Everything visibility evaluation can see: the patient-attribute map and
/// the recorded outputs of already-completed steps, keyed by step id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    #[serde(default)]
    pub patient: AHashMap<String, Value>,
    #[serde(default)]
    pub step_outputs: AHashMap<String, AHashMap<String, Value>>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patient_attribute(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.patient.insert(field.to_string(), value.into());
        self
    }

    pub fn with_step_output(mut self, step_id: &str, field: &str, value: impl Into<Value>) -> Self {
        self.step_outputs
            .entry(step_id.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
        self
    }

    /// Resolves a condition's source value, or `None` when the attribute or
    /// step output has not been recorded.
    pub(crate) fn resolve(&self, condition: &StepCondition) -> Option<&Value> {
        match condition.source {
            ConditionSource::Patient => self.patient.get(&condition.field),
            ConditionSource::Step => condition
                .step_id
                .as_deref()
                .and_then(|id| self.step_outputs.get(id))
                .and_then(|outputs| outputs.get(&condition.field)),
        }
    }
}
