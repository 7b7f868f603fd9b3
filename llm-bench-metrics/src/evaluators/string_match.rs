use llm_bench_core::{EvaluationOutput, EvaluatorKind, JudgedTable, Result};

use super::accuracy::BooleanAccuracyEvaluator;
use super::{category_breakdown, Evaluator};

/// Boolean accuracy plus a per-category breakdown when the table has categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringMatchEvaluator;

impl Evaluator for StringMatchEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::StringMatch
    }

    fn summarize(&self, table: &JudgedTable) -> Result<EvaluationOutput> {
        let mut out = BooleanAccuracyEvaluator::accuracy_output(self.kind(), table);
        out.per_category = category_breakdown(table, 4);
        Ok(out)
    }
}
