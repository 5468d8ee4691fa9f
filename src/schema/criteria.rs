use crate::error::CriteriaError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A workflow-level predicate restricting which patients a workflow applies
/// to.
///
/// The `{field, operator, value}` triple is stored structurally and is the
/// source of truth; the flattened `"field operator value"` string older
/// builders persisted is kept only as a derived display form (see
/// [`EligibilityCriterion::condition`]). Values containing whitespace
/// round-trip losslessly through the triple, which the flattened form could
/// not do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCriterion {
    /// Tag from the backend-owned catalog (demographics, patient
    /// attributes, program, provider role, visit type).
    pub criteria_type: String,
    pub field: String,
    /// Free-form comparison token (`">="`, `"contains"`, ...). The catalog
    /// of valid operators is owned by the evaluating backend and differs per
    /// criteria type, so it is carried opaquely here.
    pub operator: String,
    pub value: String,
}

impl EligibilityCriterion {
    pub fn new(criteria_type: &str, field: &str, operator: &str, value: &str) -> Self {
        Self {
            criteria_type: criteria_type.to_string(),
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
    }

    /// The flattened display form older builders used as their storage
    /// encoding. Derived only; ambiguous for values containing whitespace
    /// and therefore never parsed back except through [`Self::from_legacy`].
    pub fn condition(&self) -> String {
        format!("{} {} {}", self.field, self.operator, self.value)
    }

    /// Parses a criterion from the legacy flattened encoding.
    ///
    /// The legacy form is only well-defined when it splits into exactly
    /// three whitespace tokens; anything else (a multi-word value, a missing
    /// operand) is rejected rather than silently mis-assigned.
    pub fn from_legacy(criteria_type: &str, condition: &str) -> Result<Self, CriteriaError> {
        let tokens: Vec<&str> = condition.split_whitespace().collect();
        let [field, operator, value] = tokens[..] else {
            return Err(CriteriaError::MalformedCondition {
                condition: condition.to_string(),
                token_count: tokens.len(),
            });
        };
        Ok(Self::new(criteria_type, field, operator, value))
    }

    /// The structured triple, in `(field, operator, value)` order.
    pub fn decode(&self) -> (&str, &str, &str) {
        (&self.field, &self.operator, &self.value)
    }
}

impl fmt::Display for EligibilityCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.criteria_type, self.condition())
    }
}

/// Returns a copy of `list` with a new criterion appended.
pub fn add_criterion(
    list: &[EligibilityCriterion],
    criteria_type: &str,
    field: &str,
    operator: &str,
    value: &str,
) -> Vec<EligibilityCriterion> {
    let mut next = list.to_vec();
    next.push(EligibilityCriterion::new(criteria_type, field, operator, value));
    next
}

/// Returns a copy of `list` with the criterion at `index` removed.
pub fn remove_criterion(
    list: &[EligibilityCriterion],
    index: usize,
) -> Result<Vec<EligibilityCriterion>, CriteriaError> {
    if index >= list.len() {
        return Err(CriteriaError::IndexOutOfBounds {
            index,
            len: list.len(),
        });
    }
    let mut next = list.to_vec();
    next.remove(index);
    Ok(next)
}
