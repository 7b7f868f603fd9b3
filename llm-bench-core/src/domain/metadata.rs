use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{RunId, TaskId};
use super::table::ScoringColumn;
use super::task::TaskKind;

/// Judge families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JudgeKind {
    Exact,
    Contains,
    Structural,
    Semantic,
    RubricBoolean,
    RubricScore,
    FreeForm,
}

impl JudgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeKind::Exact => "exact",
            JudgeKind::Contains => "contains",
            JudgeKind::Structural => "structural",
            JudgeKind::Semantic => "semantic",
            JudgeKind::RubricBoolean => "rubric_boolean",
            JudgeKind::RubricScore => "rubric_score",
            JudgeKind::FreeForm => "free_form",
        }
    }

    /// The column this judge family adds to the table.
    pub fn scoring_column(&self) -> ScoringColumn {
        match self {
            JudgeKind::RubricScore | JudgeKind::FreeForm => ScoringColumn::Score,
            _ => ScoringColumn::IsCorrect,
        }
    }

    pub fn is_model_assisted(&self) -> bool {
        matches!(
            self,
            JudgeKind::Semantic
                | JudgeKind::RubricBoolean
                | JudgeKind::RubricScore
                | JudgeKind::FreeForm
        )
    }
}

impl fmt::Display for JudgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The section a judge attaches to run metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeInfo {
    #[serde(rename = "type")]
    pub kind: JudgeKind,
    pub judge_model: Option<String>,
    pub model_params: Option<serde_json::Value>,
    pub rubric: Option<String>,
    pub invalid_count: usize,
}

/// Provenance of one run.
///
/// Built by the runner. Later stages layer their own section on top through
/// the consuming `with_*` methods and never touch the fields already written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunMetadata {
    pub run_id: RunId,
    pub task_id: TaskId,
    pub task_kind: TaskKind,
    pub created_at: DateTime<Utc>,

    pub dataset_path: String,
    pub dataset_name: String,
    pub sample_size: usize,
    pub seed: Option<u64>,
    pub replace: bool,
    pub system_instruction: String,
    pub instruction: Option<String>,

    pub model_name: String,
    pub model_params: serde_json::Value,

    pub measured_count: usize,
    /// Mean generation latency over the measured subset; absent when nothing was measured.
    pub latency_ms_avg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge: Option<JudgeInfo>,
}

impl RunMetadata {
    pub fn with_judge(self, judge: JudgeInfo) -> Self {
        Self {
            judge: Some(judge),
            ..self
        }
    }
}
