use crate::evaluator::Value;
use thiserror::Error;

/// Errors raised while validating or editing a workflow schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Workflow name must not be empty")]
    EmptyName,

    #[error("Step '{step_id}' has render type 'form' but no form id")]
    MissingFormId { step_id: String },

    #[error("Step id '{step_id}' is already used by another step in this workflow")]
    DuplicateStepId { step_id: String },

    #[error("A condition on step '{step_id}' references step '{referenced}', which does not exist")]
    DanglingStepReference { step_id: String, referenced: String },

    #[error(
        "A condition on step '{step_id}' references step '{referenced}', which is not an earlier step"
    )]
    ForwardStepReference { step_id: String, referenced: String },

    #[error("A step-sourced condition on step '{step_id}' is missing its step reference")]
    MissingStepReference { step_id: String },

    #[error("Step index {index} is out of bounds for a workflow with {len} steps")]
    StepIndexOutOfBounds { index: usize, len: usize },
}

/// Errors that can occur while evaluating visibility conditions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error(
        "Numeric operator '{operator}' applied to non-numeric operand '{found}' for field '{field}'"
    )]
    NumericConversion {
        operator: &'static str,
        field: String,
        found: Value,
    },
}

/// Errors raised by the eligibility criteria model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CriteriaError {
    #[error(
        "Legacy criterion condition '{condition}' splits into {token_count} tokens, expected exactly 3 (field, operator, value)"
    )]
    MalformedCondition {
        condition: String,
        token_count: usize,
    },

    #[error("Criterion index {index} is out of bounds for a list of {len} criteria")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Errors raised by schema and draft persistence.
///
/// Store failures are never fatal: the in-memory schema is left untouched so
/// the caller can retry the save.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize workflow schema: {0}")]
    Serialization(String),

    #[error("Failed to deserialize workflow schema: {0}")]
    Deserialization(String),

    #[error("No workflow metadata recorded for uuid '{0}'")]
    UnknownUuid(String),
}

/// Errors that can occur when converting a custom builder format into a
/// canonical `WorkflowSchema`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid workflow data: {0}")]
    ValidationError(String),
}
