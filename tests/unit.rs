//! Unit tests for display formats, allocators, and error messages.
mod common;
use careflow::prelude::*;

#[test]
fn test_value_display() {
    assert_eq!(Value::Number(42.0).to_string(), "42");
    assert_eq!(Value::Number(36.6).to_string(), "36.6");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Text("done".to_string()).to_string(), "done");
    assert_eq!(Value::Null.to_string(), "null");
}

#[test]
fn test_value_numeric_coercion() {
    assert_eq!(Value::Number(18.0).as_number(), Some(18.0));
    assert_eq!(Value::Text(" 18 ".to_string()).as_number(), Some(18.0));
    assert_eq!(Value::Text("eighteen".to_string()).as_number(), None);
    assert_eq!(Value::Bool(true).as_number(), None);
    assert_eq!(Value::Null.as_number(), None);
}

#[test]
fn test_operator_display_matches_wire_names() {
    assert_eq!(ConditionOperator::Equals.to_string(), "equals");
    assert_eq!(ConditionOperator::Contains.to_string(), "contains");
    assert_eq!(ConditionOperator::GreaterThan.to_string(), "gt");
    assert_eq!(ConditionOperator::LessThan.to_string(), "lt");
}

#[test]
fn test_operator_wire_round_trip() {
    for operator in [
        ConditionOperator::Equals,
        ConditionOperator::Contains,
        ConditionOperator::GreaterThan,
        ConditionOperator::LessThan,
    ] {
        let json = serde_json::to_string(&operator).unwrap();
        assert_eq!(json, format!("\"{}\"", operator.as_str()));
        let back: ConditionOperator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, operator);
    }
}

#[test]
fn test_allocator_is_monotonic() {
    let mut allocator = StepIdAllocator::new();
    assert_eq!(allocator.allocate(), "step-0");
    assert_eq!(allocator.allocate(), "step-1");
    assert_eq!(allocator.next_ordinal(), 2);
}

#[test]
fn test_allocator_seeding_ignores_foreign_ids() {
    let schema = WorkflowSchema {
        name: "Mixed".to_string(),
        sync_patient: false,
        steps: vec![
            Step {
                id: "s0".to_string(),
                render_type: RenderType::Conditions,
                form_id: None,
                skippable: false,
                weight: None,
                visibility: Visibility::default(),
            },
            Step {
                id: "step-12".to_string(),
                render_type: RenderType::Orders,
                form_id: None,
                skippable: false,
                weight: None,
                visibility: Visibility::default(),
            },
        ],
    };
    let mut allocator = StepIdAllocator::seeded_from(&schema);
    assert_eq!(allocator.allocate(), "step-13");
}

#[test]
fn test_condition_trace_display() {
    let resolved = ConditionTrace {
        source: "$s0.status".to_string(),
        operator: ConditionOperator::Equals,
        expected: "done".to_string(),
        actual: Some(Value::Text("pending".to_string())),
        outcome: false,
    };
    assert_eq!(
        resolved.to_string(),
        "$s0.status equals \"done\" (was \"pending\") -> false"
    );

    let missing = ConditionTrace {
        source: "$patient.age".to_string(),
        operator: ConditionOperator::GreaterThan,
        expected: "17".to_string(),
        actual: None,
        outcome: false,
    };
    assert_eq!(
        missing.to_string(),
        "$patient.age gt \"17\" (missing) -> false"
    );
}

#[test]
fn test_editor_debug_summarizes_the_draft_store() {
    let editor = SchemaEditor::create("Debuggable")
        .unwrap()
        .with_draft_store(Box::new(MemoryDraftStore::new()));
    let rendered = format!("{:?}", editor);
    assert!(rendered.contains("SchemaEditor"));
    assert!(rendered.contains("draft_store_attached: true"));
}

#[test]
fn test_error_display() {
    let err = SchemaError::DanglingStepReference {
        step_id: "step-3".to_string(),
        referenced: "step-1".to_string(),
    };
    assert!(err.to_string().contains("step-3"));
    assert!(err.to_string().contains("step-1"));

    let eval_err = EvaluationError::NumericConversion {
        operator: ">",
        field: "age".to_string(),
        found: Value::Text("unknown".to_string()),
    };
    assert!(eval_err.to_string().contains('>'));
    assert!(eval_err.to_string().contains("age"));
    assert!(eval_err.to_string().contains("unknown"));

    let criteria_err = CriteriaError::MalformedCondition {
        condition: "reason contains severe pain".to_string(),
        token_count: 4,
    };
    assert!(criteria_err.to_string().contains("4 tokens"));
}
