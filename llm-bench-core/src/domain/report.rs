use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::metadata::RunMetadata;
use super::table::ScoringColumn;
use super::task::TaskKind;

/// Evaluator families; the serialized name is the report's `type` tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    #[serde(rename = "accuracy")]
    BooleanAccuracy,
    #[serde(rename = "score_avg")]
    ScoreSummary,
    MultipleChoice,
    RubricDistribution,
    StringMatch,
}

impl EvaluatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorKind::BooleanAccuracy => "accuracy",
            EvaluatorKind::ScoreSummary => "score_avg",
            EvaluatorKind::MultipleChoice => "multiple_choice",
            EvaluatorKind::RubricDistribution => "rubric_distribution",
            EvaluatorKind::StringMatch => "string_match",
        }
    }

    /// The scoring column this evaluator aggregates.
    pub fn required_column(&self) -> ScoringColumn {
        match self {
            EvaluatorKind::BooleanAccuracy
            | EvaluatorKind::MultipleChoice
            | EvaluatorKind::StringMatch => ScoringColumn::IsCorrect,
            EvaluatorKind::ScoreSummary | EvaluatorKind::RubricDistribution => {
                ScoringColumn::Score
            }
        }
    }

    pub fn default_for(kind: TaskKind) -> Self {
        match kind {
            TaskKind::MultipleChoice => EvaluatorKind::MultipleChoice,
            TaskKind::StringBased => EvaluatorKind::StringMatch,
            TaskKind::PromptBased => EvaluatorKind::RubricDistribution,
        }
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    /// Rows are true indices, columns predicted indices.
    pub matrix: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: usize,
    pub accuracy: Option<f64>,
}

/// The `out` object of an evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationOutput {
    #[serde(rename = "type")]
    pub kind: EvaluatorKind,
    pub count: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// `None` serializes as `null`: the statistic is undefined for this table.
    pub metrics: BTreeMap<String, Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confusion_matrix: Option<ConfusionMatrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_category: Option<Vec<CategoryBreakdown>>,
}

impl EvaluationOutput {
    pub fn new(kind: EvaluatorKind, count: usize, valid_count: usize) -> Self {
        Self {
            kind,
            count,
            valid_count,
            invalid_count: count.saturating_sub(valid_count),
            metrics: BTreeMap::new(),
            confusion_matrix: None,
            per_category: None,
        }
    }

    pub fn with_metric(mut self, name: &str, value: Option<f64>) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().flatten()
    }
}

/// Terminal artifact of a run: `{"metadata": ..., "out": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationReport {
    pub metadata: RunMetadata,
    pub out: EvaluationOutput,
}
