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

const REPLY_FORMAT: &str = "Return STRICT JSON with exactly this format:\n\
{\n  \"passed\": true or false\n}\n\
No code fences, no markdown, no additional commentary. Only the JSON literals true or false are allowed.";

/// Pass/fail against a rubric, decided by a judge model replying in JSON.
///
/// Rows whose reply is not JSON, lacks `passed`, or carries anything other
/// than a JSON boolean there are left without a value.
pub struct RubricBooleanJudge {
    model: Arc<dyn TextGenerator>,
    rubric: String,
}

impl RubricBooleanJudge {
    pub fn new(model: Arc<dyn TextGenerator>, rubric: &str) -> Result<Self> {
        Ok(Self {
            model,
            rubric: require_rubric(rubric, JudgeKind::RubricBoolean)?,
        })
    }

    pub fn rubric(&self) -> &str {
        &self.rubric
    }

    pub fn parse_reply(reply: &str) -> Result<bool> {
        match parse_reply_field(reply, "passed")? {
            Value::Bool(passed) => Ok(passed),
            other => Err(BenchError::Evaluation(format!(
                "\"passed\" must be a JSON boolean (true or false), got {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl Judge for RubricBooleanJudge {
    fn kind(&self) -> JudgeKind {
        JudgeKind::RubricBoolean
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
        Ok(Verdict::correct(Self::parse_reply(&reply)?))
    }
}
