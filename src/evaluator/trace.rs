use super::context::Value;
use crate::schema::ConditionOperator;
use std::fmt;

/// A record of how one condition resolved during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionTrace {
    /// Display reference of the source, e.g. `$patient.age` or
    /// `$step-0.status`.
    pub source: String,
    pub operator: ConditionOperator,
    /// The condition's literal right-hand value.
    pub expected: String,
    /// The resolved source value; `None` when it was missing from the
    /// context (fail-closed `false`).
    pub actual: Option<Value>,
    pub outcome: bool,
}

impl fmt::Display for ConditionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actual {
            Some(actual) => write!(
                f,
                "{} {} \"{}\" (was \"{}\") -> {}",
                self.source, self.operator, self.expected, actual, self.outcome
            ),
            None => write!(
                f,
                "{} {} \"{}\" (missing) -> false",
                self.source, self.operator, self.expected
            ),
        }
    }
}

/// The full account of one step's visibility decision.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityTrace {
    pub step_id: String,
    pub visible: bool,
    /// Conditions in evaluation order, up to and including the first
    /// `false` (evaluation short-circuits on it).
    pub conditions: Vec<ConditionTrace>,
}

impl VisibilityTrace {
    /// A human-readable explanation of the decision, suitable for the
    /// editor surface.
    ///
    /// Shows only the decisive part: the failing condition when hidden, the
    /// full conjunction when visible.
    pub fn reason(&self) -> String {
        if self.conditions.is_empty() {
            return "no conditions (always visible)".to_string();
        }
        if self.visible {
            self.conditions
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" AND ")
        } else {
            // Short-circuiting guarantees the last recorded trace is the
            // failing one.
            self.conditions
                .last()
                .map(|c| c.to_string())
                .unwrap_or_default()
        }
    }
}
