use llm_bench_core::{EvaluationOutput, EvaluatorKind, JudgedTable, Result};

use super::{valid_values, Evaluator};
use crate::statistical::StatisticalAnalyzer;

const PERCENTILES: [(&str, f64); 3] = [("p25", 0.25), ("p50", 0.5), ("p75", 0.75)];

/// Distribution of rubric scores: mean, population standard deviation (n)
/// and quartiles.
///
/// `count` is the number of valid scores. With none, every statistic is `0.0`
/// instead of null, unlike [`super::ScoreSummaryEvaluator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RubricDistributionEvaluator;

impl Evaluator for RubricDistributionEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::RubricDistribution
    }

    fn summarize(&self, table: &JudgedTable) -> Result<EvaluationOutput> {
        let values = valid_values(table);
        let stat = |value: Option<f64>| {
            Some(value.map_or(0.0, |v| StatisticalAnalyzer::round_to(v, 6)))
        };

        let mut out = EvaluationOutput::new(self.kind(), values.len(), values.len())
            .with_metric("average_score", stat(StatisticalAnalyzer::mean(&values)))
            .with_metric(
                "std_score",
                stat(StatisticalAnalyzer::population_std_dev(&values)),
            );
        for (name, q) in PERCENTILES {
            out = out.with_metric(name, stat(StatisticalAnalyzer::percentile(&values, q)));
        }
        out.invalid_count = table.len() - values.len();

        Ok(out)
    }
}
