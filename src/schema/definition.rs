use crate::error::SchemaError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The complete, canonical definition of one wizard workflow.
///
/// This is the value the builder UI edits and the persistence layer
/// serializes. Step order in `steps` is the sole execution/display order;
/// every edit operation returns a new value rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSchema {
    pub name: String,
    /// Whether completing the workflow triggers an external patient sync.
    #[serde(default)]
    pub sync_patient: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One stage of a multi-step workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Opaque identity, unique within a schema. Assigned once at creation
    /// and never recomputed from position.
    pub id: String,
    pub render_type: RenderType,
    /// Required iff `render_type` is [`RenderType::Form`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default)]
    pub skippable: bool,
    /// Carried for wire compatibility with older builders; consumed by no
    /// evaluation logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    #[serde(default, skip_serializing_if = "Visibility::is_empty")]
    pub visibility: Visibility,
}

/// How a step is rendered by the consuming workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderType {
    Form,
    Conditions,
    Orders,
    Medications,
    Allergies,
    Diagnosis,
    FormWorkspace,
    Appointments,
}

/// The visibility block of a step: an implicitly AND-ed list of conditions.
/// An empty list means the step is always shown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Visibility {
    #[serde(default)]
    pub conditions: Vec<StepCondition>,
}

impl Visibility {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// A single visibility predicate attached to a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCondition {
    pub source: ConditionSource,
    /// Required iff `source` is [`ConditionSource::Step`]; must name a step
    /// at a strictly earlier position than the owning step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    /// Free-form key interpreted by the evaluator against the resolved
    /// source map. Never validated against an allow-list.
    pub field: String,
    pub operator: ConditionOperator,
    pub value: String,
}

impl StepCondition {
    /// A condition evaluated against the patient-attribute map.
    pub fn patient(field: &str, operator: ConditionOperator, value: &str) -> Self {
        Self {
            source: ConditionSource::Patient,
            step_id: None,
            field: field.to_string(),
            operator,
            value: value.to_string(),
        }
    }

    /// A condition evaluated against a prior step's recorded output.
    pub fn step(step_id: &str, field: &str, operator: ConditionOperator, value: &str) -> Self {
        Self {
            source: ConditionSource::Step,
            step_id: Some(step_id.to_string()),
            field: field.to_string(),
            operator,
            value: value.to_string(),
        }
    }
}

/// Where a condition's left-hand value is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionSource {
    Patient,
    Step,
}

/// The comparison applied between the resolved source value and the
/// condition's literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionOperator {
    Equals,
    Contains,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "lt")]
    LessThan,
}

impl ConditionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::GreaterThan => "gt",
            ConditionOperator::LessThan => "lt",
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl WorkflowSchema {
    /// Creates an empty workflow with the given name.
    pub fn new(name: &str) -> Result<Self, SchemaError> {
        if name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            sync_patient: false,
            steps: Vec::new(),
        })
    }

    /// Returns a copy with `name` replaced. A blank `new_name` is a no-op.
    pub fn renamed(&self, new_name: &str) -> Self {
        if new_name.trim().is_empty() {
            return self.clone();
        }
        Self {
            name: new_name.to_string(),
            ..self.clone()
        }
    }

    /// Returns a copy with the patient-sync flag replaced.
    pub fn with_sync_patient(&self, sync_patient: bool) -> Self {
        Self {
            sync_patient,
            ..self.clone()
        }
    }

    /// Position of the step with the given id, if present.
    pub fn step_index_of(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    /// Runs the full integrity pass over the schema: unique step ids, form
    /// steps carry a form id, and every step-sourced condition references an
    /// existing, strictly earlier step.
    ///
    /// Hydrated blobs written by older builders can violate any of these;
    /// the first violation is surfaced, never silently repaired.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if let Some(duplicate) = self.steps.iter().map(|s| s.id.clone()).duplicates().next() {
            return Err(SchemaError::DuplicateStepId { step_id: duplicate });
        }
        for (index, step) in self.steps.iter().enumerate() {
            self.validate_step_at(index, step)?;
        }
        Ok(())
    }

    /// Everything `validate` checks, plus the publish-only requirement that
    /// the workflow name is non-empty.
    pub fn validate_for_publish(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        self.validate()
    }

    /// Validates a single step as if it lived at `index`: form steps need a
    /// form id and step-sourced conditions may only look backwards.
    pub(crate) fn validate_step_at(&self, index: usize, step: &Step) -> Result<(), SchemaError> {
        if step.render_type == RenderType::Form && step.form_id.is_none() {
            return Err(SchemaError::MissingFormId {
                step_id: step.id.clone(),
            });
        }
        for condition in &step.visibility.conditions {
            if condition.source != ConditionSource::Step {
                continue;
            }
            let referenced =
                condition
                    .step_id
                    .as_deref()
                    .ok_or_else(|| SchemaError::MissingStepReference {
                        step_id: step.id.clone(),
                    })?;
            match self.step_index_of(referenced) {
                None => {
                    return Err(SchemaError::DanglingStepReference {
                        step_id: step.id.clone(),
                        referenced: referenced.to_string(),
                    });
                }
                Some(referenced_index) if referenced_index >= index => {
                    return Err(SchemaError::ForwardStepReference {
                        step_id: step.id.clone(),
                        referenced: referenced.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
