pub mod accuracy;
pub mod multiple_choice;
pub mod rubric_distribution;
pub mod score_summary;
pub mod string_match;

pub use accuracy::BooleanAccuracyEvaluator;
pub use multiple_choice::MultipleChoiceEvaluator;
pub use rubric_distribution::RubricDistributionEvaluator;
pub use score_summary::ScoreSummaryEvaluator;
pub use string_match::StringMatchEvaluator;

use llm_bench_core::{
    BenchError, CategoryBreakdown, EvaluationOutput, EvaluationReport, EvaluatorKind,
    JudgedTable, Result, RunMetadata,
};
use llm_bench_storage::{write_report_json, ArtifactRecord};
use std::collections::BTreeMap;
use std::path::Path;

use crate::statistical::StatisticalAnalyzer;

/// Aggregates a judged table into a report.
pub trait Evaluator: Send + Sync {
    fn kind(&self) -> EvaluatorKind;

    /// Statistics only; preconditions are checked by [`Evaluator::evaluate`].
    fn summarize(&self, table: &JudgedTable) -> Result<EvaluationOutput>;

    fn evaluate(&self, metadata: RunMetadata, table: &JudgedTable) -> Result<EvaluationReport> {
        if table.is_empty() {
            return Err(BenchError::Evaluation(format!(
                "Empty judged table passed to the '{}' evaluator",
                self.kind()
            )));
        }
        table.require_column(self.kind().required_column())?;

        let out = self.summarize(table)?;
        Ok(EvaluationReport { metadata, out })
    }

    /// Evaluates and writes the JSON report to `destination`.
    fn compute(
        &self,
        metadata: RunMetadata,
        table: &JudgedTable,
        destination: &Path,
    ) -> Result<(EvaluationReport, ArtifactRecord)> {
        let report = self.evaluate(metadata, table)?;
        let record = write_report_json(destination, &report)?;

        tracing::info!(
            "Evaluation saved: type={}, run_id={}, valid={}, invalid={}, path={}",
            self.kind(),
            report.metadata.run_id,
            report.out.valid_count,
            report.out.invalid_count,
            record.path.display()
        );
        Ok((report, record))
    }
}

pub fn build_evaluator(kind: EvaluatorKind) -> Box<dyn Evaluator> {
    match kind {
        EvaluatorKind::BooleanAccuracy => Box::new(BooleanAccuracyEvaluator),
        EvaluatorKind::ScoreSummary => Box::new(ScoreSummaryEvaluator),
        EvaluatorKind::MultipleChoice => Box::new(MultipleChoiceEvaluator),
        EvaluatorKind::RubricDistribution => Box::new(RubricDistributionEvaluator),
        EvaluatorKind::StringMatch => Box::new(StringMatchEvaluator),
    }
}

/// Numeric values of the rows the judge could evaluate, in row order.
pub(crate) fn valid_values(table: &JudgedTable) -> Vec<f64> {
    table.rows().iter().filter_map(|row| row.verdict.value()).collect()
}

/// Per-category row counts and mean of the valid values, sorted by category.
///
/// Rows without a category are left out of the breakdown. `None` when no row
/// carries one.
pub(crate) fn category_breakdown(table: &JudgedTable, places: u32) -> Option<Vec<CategoryBreakdown>> {
    if !table.has_category() {
        return None;
    }

    let mut groups: BTreeMap<&str, (usize, Vec<f64>)> = BTreeMap::new();
    for row in table.rows() {
        let Some(category) = row.result.category.as_deref() else {
            continue;
        };
        let entry = groups.entry(category).or_default();
        entry.0 += 1;
        if let Some(value) = row.verdict.value() {
            entry.1.push(value);
        }
    }

    Some(
        groups
            .into_iter()
            .map(|(category, (count, values))| CategoryBreakdown {
                category: category.to_string(),
                count,
                accuracy: StatisticalAnalyzer::mean(&values)
                    .map(|mean| StatisticalAnalyzer::round_to(mean, places)),
            })
            .collect(),
    )
}
