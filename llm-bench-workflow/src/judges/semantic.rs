use async_trait::async_trait;
use llm_bench_core::{
    BenchError, Column, GenerationRequest, JudgeInfo, JudgeKind, ResultRow, Result, TextGenerator,
    Verdict,
};
use std::sync::Arc;

use super::{assisted_info, Judge, RowFailurePolicy, JUDGE_SYSTEM_PROMPT, REFERENCE_COLUMNS};
use crate::runner::generate_text;

/// Asks a judge model whether two free-text answers mean the same thing.
pub struct SemanticJudge {
    model: Arc<dyn TextGenerator>,
}

impl SemanticJudge {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    pub fn comparison_prompt(true_answer: &str, model_answer: &str) -> String {
        format!(
            "Compare these two answers. Do they convey the same meaning?\n\n\
             Expected Answer: {true_answer}\n\
             Model's Answer: {model_answer}\n\n\
             Consider:\n\
             - Synonyms and paraphrasing are acceptable\n\
             - Grammatical differences are acceptable\n\
             - The core meaning must be the same\n\n\
             Does the Model's Answer match the Expected Answer?\n\
             Answer with only: True or False\n\n\
             Answer:"
        )
    }

    /// "true" anywhere wins, then "false"; anything else is a non-match.
    pub fn interpret(reply: &str) -> bool {
        let reply = reply.trim().to_lowercase();
        if reply.contains("true") {
            true
        } else if reply.contains("false") {
            false
        } else {
            tracing::warn!("Unclear response from semantic judge model: {:?}", reply);
            false
        }
    }
}

#[async_trait]
impl Judge for SemanticJudge {
    fn kind(&self) -> JudgeKind {
        JudgeKind::Semantic
    }

    fn required_columns(&self) -> &'static [Column] {
        REFERENCE_COLUMNS
    }

    fn failure_policy(&self) -> RowFailurePolicy {
        RowFailurePolicy::Abort
    }

    fn info(&self, invalid_count: usize) -> JudgeInfo {
        assisted_info(self.kind(), self.model.as_ref(), None, invalid_count)
    }

    async fn check_single_answer(&self, row: &ResultRow) -> Result<Verdict> {
        let true_answer = row.true_answer.as_deref().ok_or_else(|| {
            BenchError::Evaluation("true_answer cannot be empty for the semantic judge".to_string())
        })?;

        let prompt = Self::comparison_prompt(true_answer, &row.model_answer);
        let reply = generate_text(
            self.model.as_ref(),
            GenerationRequest::new(prompt, JUDGE_SYSTEM_PROMPT),
        )
        .await?;

        let passed = Self::interpret(&reply);
        tracing::debug!("Semantic check: {:?} -> {}", reply.trim(), passed);
        Ok(Verdict::correct(passed))
    }
}
