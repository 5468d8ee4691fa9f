//! # Careflow - Workflow Schema & Step-Visibility Engine
//!
//! **Careflow** is the data layer behind a visual builder for multi-step
//! clinical encounter workflows. It owns the canonical workflow schema
//! (name, patient-sync flag, ordered steps), decides which steps are shown
//! by evaluating visibility conditions against patient attributes and prior
//! step outputs, models workflow-level eligibility criteria, and persists
//! schemas as JSON blobs with a separate metadata record.
//!
//! ## Core Workflow
//!
//! 1.  **Create or hydrate**: start a new schema with [`schema::SchemaEditor::create`],
//!     or hydrate one loaded from a blob store with [`schema::SchemaEditor::hydrate`].
//! 2.  **Edit**: apply [`schema::EditorAction`]s; every edit is validated, returns a
//!     new schema value, and is advisorily snapshotted to a draft store.
//! 3.  **Evaluate**: build an [`evaluator::EvaluationContext`] and ask a
//!     [`evaluator::VisibilityEvaluator`] which steps should be shown (and why).
//! 4.  **Persist**: save the schema through a [`store::SchemaStore`] and keep
//!     the metadata record (version, publish flag, criteria) up to date.
//!
//! ## Quick Start
//!
//! ```rust
//! use careflow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut editor = SchemaEditor::create("Prenatal Intake")?;
//!
//!     editor.apply(EditorAction::AppendStep(StepDraft::form("intake-form")))?;
//!     editor.apply(EditorAction::AppendStep(
//!         StepDraft::new(RenderType::Orders).with_condition(StepCondition::step(
//!             "step-0",
//!             "status",
//!             ConditionOperator::Equals,
//!             "complete",
//!         )),
//!     ))?;
//!
//!     let ctx = EvaluationContext::new().with_step_output("step-0", "status", "complete");
//!     let evaluator = VisibilityEvaluator::new(&ctx);
//!     for step in &editor.schema().steps {
//!         println!("{}: visible={}", step.id, evaluator.is_visible(step)?);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod evaluator;
pub mod prelude;
pub mod schema;
pub mod store;
