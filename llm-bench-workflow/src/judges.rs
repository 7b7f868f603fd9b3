pub mod contains;
pub mod exact;
pub mod free_form;
pub mod rubric_boolean;
pub mod rubric_score;
pub mod semantic;
pub mod structural;

pub use contains::ContainsJudge;
pub use exact::ExactMatchJudge;
pub use free_form::FreeFormJudge;
pub use rubric_boolean::RubricBooleanJudge;
pub use rubric_score::RubricScoreJudge;
pub use semantic::SemanticJudge;
pub use structural::StructuralJudge;

use async_trait::async_trait;
use llm_bench_core::{
    BenchError, Column, JudgeInfo, JudgeKind, JudgedRow, JudgedTable, ResultRow, ResultTable,
    Result, RunMetadata, ScoringColumn, Task, TaskKind, TextGenerator, Verdict,
};
use llm_bench_storage::{write_judged_csv, ArtifactRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// System instruction sent with every auxiliary judge-model call.
pub const JUDGE_SYSTEM_PROMPT: &str = "You are an objective evaluation assistant that judges model answers \
against true answers. Always stay consistent, neutral, and concise.";

pub(crate) const REFERENCE_COLUMNS: &[Column] = &[Column::ModelAnswer, Column::TrueAnswer];
pub(crate) const ANSWER_COLUMNS: &[Column] = &[Column::ModelAnswer];

/// What happens to the whole table when a single row cannot be judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFailurePolicy {
    /// The error aborts judging and propagates with its kind unchanged.
    Abort,
    /// Evaluation and model errors leave the row's value missing.
    RecordMissing,
    /// Evaluation errors mark the row incorrect.
    CountIncorrect,
}

/// Result of judging a table: layered metadata, the judged rows and the CSV written.
#[derive(Debug, Clone)]
pub struct JudgeOutput {
    pub metadata: RunMetadata,
    pub table: JudgedTable,
    pub artifact: ArtifactRecord,
}

#[async_trait]
pub trait Judge: Send + Sync {
    fn kind(&self) -> JudgeKind;

    fn required_columns(&self) -> &'static [Column];

    fn failure_policy(&self) -> RowFailurePolicy;

    /// The section attached to run metadata once judging completes.
    fn info(&self, invalid_count: usize) -> JudgeInfo {
        JudgeInfo {
            kind: self.kind(),
            judge_model: None,
            model_params: None,
            rubric: None,
            invalid_count,
        }
    }

    fn column(&self) -> ScoringColumn {
        self.kind().scoring_column()
    }

    async fn check_single_answer(&self, row: &ResultRow) -> Result<Verdict>;

    /// Judges every row in order, applying the failure policy per row.
    async fn judge_table(&self, table: ResultTable) -> Result<JudgedTable> {
        table.require_columns(self.required_columns())?;

        let policy = self.failure_policy();
        let mut rows = Vec::with_capacity(table.len());
        for (idx, result) in table.into_rows().into_iter().enumerate() {
            let verdict = match self.check_single_answer(&result).await {
                Ok(verdict) => verdict,
                Err(err) => match (policy, &err) {
                    (
                        RowFailurePolicy::RecordMissing,
                        BenchError::Evaluation(_) | BenchError::Model(_),
                    ) => {
                        tracing::warn!("{} judge: row {} left unjudged: {}", self.kind(), idx, err);
                        Verdict::missing(self.column())
                    }
                    (RowFailurePolicy::CountIncorrect, BenchError::Evaluation(_)) => {
                        tracing::warn!("{} judge: row {} counted incorrect: {}", self.kind(), idx, err);
                        Verdict::correct(false)
                    }
                    _ => return Err(err.with_context(format!("{} judge, row {}", self.kind(), idx))),
                },
            };
            tracing::debug!("{} judge: row {} -> {:?}", self.kind(), idx, verdict);
            rows.push(JudgedRow { result, verdict });
        }

        JudgedTable::new(self.column(), rows)
    }

    /// Judges the table, writes it to `destination` and layers the judge
    /// section onto `metadata`.
    async fn check_answers(
        &self,
        metadata: RunMetadata,
        table: ResultTable,
        destination: &Path,
    ) -> Result<JudgeOutput> {
        let judged = self.judge_table(table).await?;
        let artifact = write_judged_csv(destination, &judged)?;
        let invalid_count = judged.invalid_count();
        let metadata = metadata.with_judge(self.info(invalid_count));

        tracing::info!(
            "{} check complete: run_id={}, rows={}, invalid={}, path={}",
            self.kind(),
            metadata.run_id,
            judged.len(),
            invalid_count,
            artifact.path.display()
        );
        Ok(JudgeOutput {
            metadata,
            table: judged,
            artifact,
        })
    }
}

/// Judge info for the model-assisted families.
pub(crate) fn assisted_info(
    kind: JudgeKind,
    model: &dyn TextGenerator,
    rubric: Option<&str>,
    invalid_count: usize,
) -> JudgeInfo {
    let identity = model.identity();
    JudgeInfo {
        kind,
        judge_model: Some(identity.name),
        model_params: Some(identity.params),
        rubric: rubric.map(str::to_string),
        invalid_count,
    }
}

/// Strips a surrounding markdown code fence (with or without a language tag).
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(end) = body.find("```") else {
        return trimmed;
    };
    let inner = &body[..end];
    // A language tag runs to the first newline, e.g. "json\n{...}".
    match inner.split_once('\n') {
        Some((tag, rest)) if !tag.trim_start().starts_with('{') => rest.trim(),
        _ => inner.trim(),
    }
}

/// Rubric, then the row's context blocks, then the reply format.
pub(crate) fn rubric_message(rubric: &str, row: &ResultRow, format: &str) -> String {
    let mut parts = Vec::with_capacity(3);
    if !row.question.trim().is_empty() {
        parts.push(format!("Question:\n{}", row.question));
    }
    if let Some(true_answer) = &row.true_answer {
        parts.push(format!("Reference (ground truth):\n{}", true_answer));
    }
    parts.push(format!("Model Answer:\n{}", row.model_answer));
    format!("{}\n\n{}\n\n{}", rubric, parts.join("\n\n"), format)
}

/// Parses a judge reply as a JSON object holding `key`.
pub(crate) fn parse_reply_field(text: &str, key: &str) -> Result<serde_json::Value> {
    let body = strip_code_fence(text);
    let data: serde_json::Value = serde_json::from_str(body)
        .map_err(|err| BenchError::Evaluation(format!("Invalid JSON: {}", err)))?;
    match data {
        serde_json::Value::Object(mut map) => map.remove(key).ok_or_else(|| {
            BenchError::Evaluation(format!("JSON must contain key \"{}\"", key))
        }),
        _ => Err(BenchError::Evaluation(format!(
            "JSON must be an object containing key \"{}\"",
            key
        ))),
    }
}

pub(crate) fn require_rubric(rubric: &str, kind: JudgeKind) -> Result<String> {
    let rubric = rubric.trim();
    if rubric.is_empty() {
        return Err(BenchError::Configuration(format!(
            "The '{}' judge needs a non-empty rubric",
            kind
        )));
    }
    Ok(rubric.to_string())
}

/// Serializable judge choice, as it appears in configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JudgeSpec {
    Exact,
    Contains,
    Structural,
    Semantic,
    RubricBoolean { rubric: String },
    RubricScore { rubric: String },
    FreeForm {
        #[serde(default)]
        rubric: Option<String>,
    },
}

impl JudgeSpec {
    pub fn kind(&self) -> JudgeKind {
        match self {
            JudgeSpec::Exact => JudgeKind::Exact,
            JudgeSpec::Contains => JudgeKind::Contains,
            JudgeSpec::Structural => JudgeKind::Structural,
            JudgeSpec::Semantic => JudgeKind::Semantic,
            JudgeSpec::RubricBoolean { .. } => JudgeKind::RubricBoolean,
            JudgeSpec::RubricScore { .. } => JudgeKind::RubricScore,
            JudgeSpec::FreeForm { .. } => JudgeKind::FreeForm,
        }
    }

    /// Exact for multiple choice, containment for string answers, and the
    /// free-form scorer with the task instruction as rubric for prompt tasks.
    pub fn default_for(task: &Task) -> Self {
        match task.kind() {
            TaskKind::MultipleChoice => JudgeSpec::Exact,
            TaskKind::StringBased => JudgeSpec::Contains,
            TaskKind::PromptBased => JudgeSpec::FreeForm {
                rubric: task.instruction().map(str::to_string),
            },
        }
    }

    /// Builds the judge. Model-assisted families need `judge_model`.
    pub fn build(&self, judge_model: Option<Arc<dyn TextGenerator>>) -> Result<Box<dyn Judge>> {
        let kind = self.kind();
        if !kind.is_model_assisted() && judge_model.is_some() {
            tracing::warn!("The '{}' judge makes no model calls; ignoring the judge model", kind);
        }
        let model = || {
            judge_model.clone().ok_or_else(|| {
                BenchError::Configuration(format!("The '{}' judge requires a judge model", kind))
            })
        };

        let judge: Box<dyn Judge> = match self {
            JudgeSpec::Exact => Box::new(ExactMatchJudge),
            JudgeSpec::Contains => Box::new(ContainsJudge),
            JudgeSpec::Structural => Box::new(StructuralJudge),
            JudgeSpec::Semantic => Box::new(SemanticJudge::new(model()?)),
            JudgeSpec::RubricBoolean { rubric } => {
                Box::new(RubricBooleanJudge::new(model()?, rubric)?)
            }
            JudgeSpec::RubricScore { rubric } => Box::new(RubricScoreJudge::new(model()?, rubric)?),
            JudgeSpec::FreeForm { rubric } => {
                let rubric = rubric.as_deref().ok_or_else(|| {
                    BenchError::Configuration(
                        "The 'free_form' judge needs a rubric or a task instruction".to_string(),
                    )
                })?;
                Box::new(FreeFormJudge::new(model()?, rubric)?)
            }
        };
        Ok(judge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("{\"passed\": true}"), "{\"passed\": true}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```unterminated"), "```unterminated");
    }

    #[test]
    fn test_judge_spec_wire_format() {
        let spec: JudgeSpec =
            serde_json::from_str(r#"{"type": "rubric_score", "rubric": "Be polite"}"#).unwrap();
        assert_eq!(
            spec,
            JudgeSpec::RubricScore {
                rubric: "Be polite".to_string()
            }
        );

        let spec: JudgeSpec = serde_json::from_str(r#"{"type": "free_form"}"#).unwrap();
        assert_eq!(spec, JudgeSpec::FreeForm { rubric: None });
    }
}
