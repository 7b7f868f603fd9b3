use llm_bench_core::letters::{index_to_letter, letter_to_index};
use llm_bench_core::{ConfusionMatrix, EvaluationOutput, EvaluatorKind, JudgedTable, Result};

use super::{category_breakdown, Evaluator};
use crate::statistical::StatisticalAnalyzer;

/// Accuracy over every row (unjudged rows count as wrong), a confusion matrix
/// of true against predicted letters, and a per-category breakdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleChoiceEvaluator;

impl MultipleChoiceEvaluator {
    /// `None` when no row has both a parsable reference and a parsable answer.
    ///
    /// The matrix is wide enough for the largest option list and for every
    /// parsed index, so its entries always sum to the number of parsed rows.
    pub fn confusion_matrix(table: &JudgedTable) -> Result<Option<ConfusionMatrix>> {
        let pairs: Vec<(usize, usize)> = table
            .rows()
            .iter()
            .filter_map(|row| {
                let truth = letter_to_index(row.result.true_answer.as_deref())?;
                let predicted = letter_to_index(Some(&row.result.model_answer))?;
                Some((truth, predicted))
            })
            .collect();

        if pairs.is_empty() {
            return Ok(None);
        }

        let option_count = table
            .rows()
            .iter()
            .filter_map(|row| row.result.options.as_ref().map(Vec::len))
            .max()
            .unwrap_or(0);
        let size = pairs
            .iter()
            .map(|&(t, p)| t.max(p) + 1)
            .max()
            .unwrap_or(0)
            .max(option_count);

        let labels = (0..size)
            .map(|idx| index_to_letter(idx).map(String::from))
            .collect::<Result<Vec<_>>>()?;

        let mut matrix = vec![vec![0usize; size]; size];
        for (truth, predicted) in pairs {
            matrix[truth][predicted] += 1;
        }

        Ok(Some(ConfusionMatrix { labels, matrix }))
    }
}

impl Evaluator for MultipleChoiceEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::MultipleChoice
    }

    fn summarize(&self, table: &JudgedTable) -> Result<EvaluationOutput> {
        let valid = table.len() - table.invalid_count();
        let correct: f64 = table
            .rows()
            .iter()
            .map(|row| row.verdict.value().unwrap_or(0.0))
            .sum();
        let accuracy = StatisticalAnalyzer::round_to(correct / table.len() as f64, 6);

        let mut out = EvaluationOutput::new(self.kind(), table.len(), valid)
            .with_metric("accuracy", Some(accuracy));
        out.confusion_matrix = Self::confusion_matrix(table)?;
        out.per_category = category_breakdown(table, 6);

        Ok(out)
    }
}
