use async_trait::async_trait;
use llm_bench_core::{BenchError, Column, JudgeKind, ResultRow, Result, Verdict};
use serde_json::Value;

use super::{Judge, RowFailurePolicy, REFERENCE_COLUMNS};

/// Parses both sides as JSON and compares them structurally. A side that
/// does not parse counts the row as incorrect.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralJudge;

impl StructuralJudge {
    fn parse(text: &str, side: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|err| {
            let preview: String = text.chars().take(100).collect();
            BenchError::Evaluation(format!("Invalid JSON in {}: {:?} ({})", side, preview, err))
        })
    }
}

/// Recursive equality: maps by key set then value, sequences element-wise in
/// order, scalars by value. Integers and floats never compare equal.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left.iter().all(|(key, value)| {
                    right
                        .get(key)
                        .is_some_and(|other| structurally_equal(value, other))
                })
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Number(left), Value::Number(right)) => {
            match (left.is_f64(), right.is_f64()) {
                (true, true) => left.as_f64() == right.as_f64(),
                (false, false) => left == right,
                _ => false,
            }
        }
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

#[async_trait]
impl Judge for StructuralJudge {
    fn kind(&self) -> JudgeKind {
        JudgeKind::Structural
    }

    fn required_columns(&self) -> &'static [Column] {
        REFERENCE_COLUMNS
    }

    fn failure_policy(&self) -> RowFailurePolicy {
        RowFailurePolicy::CountIncorrect
    }

    async fn check_single_answer(&self, row: &ResultRow) -> Result<Verdict> {
        let true_answer = row.true_answer.as_deref().ok_or_else(|| {
            BenchError::Evaluation("Cannot compare a missing true_answer as JSON".to_string())
        })?;
        let model = Self::parse(&row.model_answer, "model_answer")?;
        let truth = Self::parse(true_answer, "true_answer")?;

        let equal = structurally_equal(&model, &truth);
        tracing::debug!("Structural equality check: {}", equal);
        Ok(Verdict::correct(equal))
    }
}
