use crate::error::EvaluationError;
use crate::schema::Step;

pub mod context;
mod engine;
pub mod trace;

pub use context::{EvaluationContext, Value};
pub use trace::{ConditionTrace, VisibilityTrace};

use engine::ConditionEngine;

/// Decides step visibility against one evaluation context.
///
/// Stateless apart from the borrowed context; create one per evaluation
/// pass and ask it about as many steps as needed.
pub struct VisibilityEvaluator<'a> {
    ctx: &'a EvaluationContext,
}

impl<'a> VisibilityEvaluator<'a> {
    pub fn new(ctx: &'a EvaluationContext) -> Self {
        Self { ctx }
    }

    /// Whether `step` should be shown.
    ///
    /// A step with no conditions is always visible (default-open). Otherwise
    /// every condition must hold; evaluation short-circuits on the first
    /// `false`. Operators are side-effect-free, so short-circuiting has no
    /// externally observable effect beyond speed.
    pub fn is_visible(&self, step: &Step) -> Result<bool, EvaluationError> {
        let engine = ConditionEngine::new(self.ctx);
        for condition in &step.visibility.conditions {
            if !engine.evaluate(condition)?.outcome {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Like [`Self::is_visible`], but records how each evaluated condition
    /// resolved so the decision can be explained to the user.
    pub fn explain(&self, step: &Step) -> Result<VisibilityTrace, EvaluationError> {
        let engine = ConditionEngine::new(self.ctx);
        let mut conditions = Vec::with_capacity(step.visibility.conditions.len());
        let mut visible = true;
        for condition in &step.visibility.conditions {
            let trace = engine.evaluate(condition)?;
            let outcome = trace.outcome;
            conditions.push(trace);
            if !outcome {
                visible = false;
                break;
            }
        }
        Ok(VisibilityTrace {
            step_id: step.id.clone(),
            visible,
            conditions,
        })
    }
}

/// Convenience wrapper over [`VisibilityEvaluator`] for one-off checks.
pub fn is_visible(step: &Step, ctx: &EvaluationContext) -> Result<bool, EvaluationError> {
    VisibilityEvaluator::new(ctx).is_visible(step)
}
