//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types so consumers can bring in the
//! core functionality with a single `use careflow::prelude::*;`.

// Schema model and editing
pub use crate::schema::{
    ApplyOutcome, CascadeReport, ConditionOperator, ConditionSource, EditorAction,
    EligibilityCriterion, IntoWorkflow, RemovedCondition, RenderType, SchemaEditor, Step,
    StepCondition, StepDraft, StepIdAllocator, Visibility, WorkflowSchema, add_criterion,
    remove_criterion,
};

// Visibility evaluation
pub use crate::evaluator::{
    ConditionTrace, EvaluationContext, Value, VisibilityEvaluator, VisibilityTrace, is_visible,
};

// Persistence
pub use crate::store::{
    BlobReference, DraftSnapshot, DraftStore, FileDraftStore, FileSchemaStore, MemoryDraftStore,
    MetadataUpdate, SchemaStore, WorkflowMetadata,
};

// Error types
pub use crate::error::{ConversionError, CriteriaError, EvaluationError, SchemaError, StoreError};
