use async_trait::async_trait;
use llm_bench_core::{
    BenchError, Column, GenerationRequest, JudgeInfo, JudgeKind, ResultRow, Result, TextGenerator,
    Verdict,
};
use serde_json::Value;
use std::sync::Arc;

use super::{
    assisted_info, parse_reply_field, require_rubric, rubric_message, Judge, RowFailurePolicy,
    ANSWER_COLUMNS, JUDGE_SYSTEM_PROMPT,
};
use crate::runner::generate_text;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

const REPLY_FORMAT: &str = "Return STRICT JSON with exactly this format:\n\
{\n  \"score\": number  // integer or float between 0 and 10\n}\n\
No code fences, no markdown, no extra text.";

/// 0-10 score against a rubric, decided by a judge model replying in JSON.
///
/// Out-of-range and non-numeric scores leave the row without a value; they
/// are never clamped.
pub struct RubricScoreJudge {
    model: Arc<dyn TextGenerator>,
    rubric: String,
}

impl RubricScoreJudge {
    pub fn new(model: Arc<dyn TextGenerator>, rubric: &str) -> Result<Self> {
        Ok(Self {
            model,
            rubric: require_rubric(rubric, JudgeKind::RubricScore)?,
        })
    }

    pub fn rubric(&self) -> &str {
        &self.rubric
    }

    pub fn parse_reply(reply: &str) -> Result<f64> {
        let raw = match parse_reply_field(reply, "score")? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|score| score.is_finite())
        .ok_or_else(|| BenchError::Evaluation("\"score\" must be numeric".to_string()))?;

        if !(MIN_SCORE..=MAX_SCORE).contains(&raw) {
            return Err(BenchError::Evaluation(format!(
                "Score {} out of expected 0-10 range",
                raw
            )));
        }
        Ok(raw)
    }
}

#[async_trait]
impl Judge for RubricScoreJudge {
    fn kind(&self) -> JudgeKind {
        JudgeKind::RubricScore
    }

    fn required_columns(&self) -> &'static [Column] {
        ANSWER_COLUMNS
    }

    fn failure_policy(&self) -> RowFailurePolicy {
        RowFailurePolicy::RecordMissing
    }

    fn info(&self, invalid_count: usize) -> JudgeInfo {
        assisted_info(self.kind(), self.model.as_ref(), Some(&self.rubric), invalid_count)
    }

    async fn check_single_answer(&self, row: &ResultRow) -> Result<Verdict> {
        let message = rubric_message(&self.rubric, row, REPLY_FORMAT);
        let reply = generate_text(
            self.model.as_ref(),
            GenerationRequest::new(message, JUDGE_SYSTEM_PROMPT),
        )
        .await?;
        Ok(Verdict::score(Self::parse_reply(&reply)?))
    }
}
