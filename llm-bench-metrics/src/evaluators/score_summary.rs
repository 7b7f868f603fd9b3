use llm_bench_core::{EvaluationOutput, EvaluatorKind, JudgedTable, Result};

use super::{valid_values, Evaluator};
use crate::statistical::StatisticalAnalyzer;

/// Sample mean and sample standard deviation (n - 1) of the valid scores.
///
/// `avg` is null without valid scores, `std` is null below two.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreSummaryEvaluator;

impl Evaluator for ScoreSummaryEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::ScoreSummary
    }

    fn summarize(&self, table: &JudgedTable) -> Result<EvaluationOutput> {
        let values = valid_values(table);
        let avg = StatisticalAnalyzer::mean(&values).map(|v| StatisticalAnalyzer::round_to(v, 4));
        let std = StatisticalAnalyzer::sample_std_dev(&values)
            .map(|v| StatisticalAnalyzer::round_to(v, 4));

        Ok(EvaluationOutput::new(self.kind(), table.len(), values.len())
            .with_metric("avg", avg)
            .with_metric("std", std))
    }
}
