use super::definition::WorkflowSchema;
use crate::error::ConversionError;

/// A trait for custom builder formats that can be converted into a canonical
/// `WorkflowSchema`.
///
/// This is the extension point that keeps the engine format-agnostic: a host
/// that stores workflows in its own JSON shape implements `IntoWorkflow` on
/// its parsed structs and hands the result to the editor or evaluator.
///
/// # Example
///
/// ```rust,no_run
/// use careflow::prelude::*;
/// use careflow::error::ConversionError;
///
/// struct LegacyWizard {
///     title: String,
/// }
///
/// impl IntoWorkflow for LegacyWizard {
///     fn into_workflow(self) -> Result<WorkflowSchema, ConversionError> {
///         WorkflowSchema::new(&self.title)
///             .map_err(|e| ConversionError::ValidationError(e.to_string()))
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a canonical workflow schema.
    fn into_workflow(self) -> Result<WorkflowSchema, ConversionError>;
}
