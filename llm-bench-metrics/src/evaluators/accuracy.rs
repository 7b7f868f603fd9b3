use llm_bench_core::{EvaluationOutput, EvaluatorKind, JudgedTable, Result};

use super::{valid_values, Evaluator};
use crate::statistical::StatisticalAnalyzer;

/// Mean of the coercible `is_correct` values. Rows the judge could not
/// evaluate are counted as invalid, never as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanAccuracyEvaluator;

impl BooleanAccuracyEvaluator {
    pub(crate) fn accuracy_output(kind: EvaluatorKind, table: &JudgedTable) -> EvaluationOutput {
        let values = valid_values(table);
        let accuracy =
            StatisticalAnalyzer::mean(&values).map(|mean| StatisticalAnalyzer::round_to(mean, 4));

        EvaluationOutput::new(kind, table.len(), values.len()).with_metric("accuracy", accuracy)
    }
}

impl Evaluator for BooleanAccuracyEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::BooleanAccuracy
    }

    fn summarize(&self, table: &JudgedTable) -> Result<EvaluationOutput> {
        Ok(Self::accuracy_output(self.kind(), table))
    }
}
