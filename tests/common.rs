//! Common test utilities for building workflow schemas and contexts.
use careflow::prelude::*;
use std::path::PathBuf;

/// The two-step reference scenario: a skippable intake form `s0` followed by
/// an orders step that is only visible once `s0` reports `status = done`.
#[allow(dead_code)]
pub fn flow_schema() -> WorkflowSchema {
    WorkflowSchema {
        name: "Flow".to_string(),
        sync_patient: false,
        steps: vec![
            Step {
                id: "s0".to_string(),
                render_type: RenderType::Form,
                form_id: Some("f1".to_string()),
                skippable: true,
                weight: None,
                visibility: Visibility::default(),
            },
            Step {
                id: "s1".to_string(),
                render_type: RenderType::Orders,
                form_id: None,
                skippable: false,
                weight: None,
                visibility: Visibility {
                    conditions: vec![StepCondition::step(
                        "s0",
                        "status",
                        ConditionOperator::Equals,
                        "done",
                    )],
                },
            },
        ],
    }
}

/// Builds an editor with a form step and a dependent orders step, ids
/// assigned by the allocator (`step-0`, `step-1`).
#[allow(dead_code)]
pub fn editor_with_two_steps() -> SchemaEditor {
    let mut editor = SchemaEditor::create("Prenatal Intake").expect("Failed to create editor");
    editor
        .apply(EditorAction::AppendStep(
            StepDraft::form("intake-form").skippable(true),
        ))
        .expect("Failed to append form step");
    editor
        .apply(EditorAction::AppendStep(
            StepDraft::new(RenderType::Orders).with_condition(StepCondition::step(
                "step-0",
                "status",
                ConditionOperator::Equals,
                "complete",
            )),
        ))
        .expect("Failed to append orders step");
    editor
}

#[allow(dead_code)]
pub fn done_context() -> EvaluationContext {
    EvaluationContext::new().with_step_output("s0", "status", "done")
}

#[allow(dead_code)]
pub fn pending_context() -> EvaluationContext {
    EvaluationContext::new().with_step_output("s0", "status", "pending")
}

/// A per-process temp path for store tests.
#[allow(dead_code)]
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("careflow-test-{}-{}", std::process::id(), name))
}
