use super::context::{EvaluationContext, Value};
use super::trace::ConditionTrace;
use crate::error::EvaluationError;
use crate::schema::{ConditionOperator, StepCondition};

/// Evaluates single conditions against one fully-populated context.
pub(super) struct ConditionEngine<'a> {
    ctx: &'a EvaluationContext,
}

impl<'a> ConditionEngine<'a> {
    pub(super) fn new(ctx: &'a EvaluationContext) -> Self {
        Self { ctx }
    }

    /// Evaluates one condition and records how it resolved.
    ///
    /// A source value missing from the context evaluates to `false`
    /// (fail-closed: the step stays hidden rather than leaking unintended
    /// display). Numeric operators on non-numeric operands are an error,
    /// never a silent `false`.
    pub(super) fn evaluate(
        &self,
        condition: &StepCondition,
    ) -> Result<ConditionTrace, EvaluationError> {
        let actual = self.ctx.resolve(condition);
        let outcome = match actual {
            None => false,
            Some(actual) => self.apply(condition, actual)?,
        };
        Ok(ConditionTrace {
            source: Self::source_ref(condition),
            operator: condition.operator,
            expected: condition.value.clone(),
            actual: actual.cloned(),
            outcome,
        })
    }

    fn apply(&self, condition: &StepCondition, actual: &Value) -> Result<bool, EvaluationError> {
        match condition.operator {
            ConditionOperator::Equals => Ok(actual.as_text() == condition.value),
            ConditionOperator::Contains => Ok(actual.as_text().contains(&condition.value)),
            ConditionOperator::GreaterThan => {
                let (left, right) = self.numeric_operands(condition, actual, ">")?;
                Ok(left > right)
            }
            ConditionOperator::LessThan => {
                let (left, right) = self.numeric_operands(condition, actual, "<")?;
                Ok(left < right)
            }
        }
    }

    fn numeric_operands(
        &self,
        condition: &StepCondition,
        actual: &Value,
        operator: &'static str,
    ) -> Result<(f64, f64), EvaluationError> {
        let left = actual
            .as_number()
            .ok_or_else(|| EvaluationError::NumericConversion {
                operator,
                field: condition.field.clone(),
                found: actual.clone(),
            })?;
        let right = condition.value.trim().parse::<f64>().map_err(|_| {
            EvaluationError::NumericConversion {
                operator,
                field: condition.field.clone(),
                found: Value::Text(condition.value.clone()),
            }
        })?;
        Ok((left, right))
    }

    /// `$patient.age` or `$step-0.status`, matching the builder's display
    /// convention for condition sources.
    fn source_ref(condition: &StepCondition) -> String {
        match &condition.step_id {
            Some(step_id) => format!("${}.{}", step_id, condition.field),
            None => format!("$patient.{}", condition.field),
        }
    }
}
