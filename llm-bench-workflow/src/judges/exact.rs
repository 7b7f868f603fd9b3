use async_trait::async_trait;
use llm_bench_core::{BenchError, Column, JudgeKind, ResultRow, Result, Verdict};

use super::{Judge, RowFailurePolicy, REFERENCE_COLUMNS};

/// Case-insensitive, trimmed equality. Used for multiple-choice letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatchJudge;

impl ExactMatchJudge {
    pub fn matches(model_answer: &str, true_answer: &str) -> bool {
        model_answer.trim().to_uppercase() == true_answer.trim().to_uppercase()
    }
}

#[async_trait]
impl Judge for ExactMatchJudge {
    fn kind(&self) -> JudgeKind {
        JudgeKind::Exact
    }

    fn required_columns(&self) -> &'static [Column] {
        REFERENCE_COLUMNS
    }

    fn failure_policy(&self) -> RowFailurePolicy {
        RowFailurePolicy::Abort
    }

    async fn check_single_answer(&self, row: &ResultRow) -> Result<Verdict> {
        let true_answer = row.true_answer.as_deref().ok_or_else(|| {
            BenchError::Evaluation("true_answer cannot be empty for the exact judge".to_string())
        })?;
        Ok(Verdict::correct(Self::matches(&row.model_answer, true_answer)))
    }
}
