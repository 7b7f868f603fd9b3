use async_trait::async_trait;
use llm_bench_core::{
    Column, GenerationRequest, JudgeInfo, JudgeKind, ResultRow, Result, TextGenerator, Verdict,
};
use regex::Regex;
use std::sync::{Arc, OnceLock};

use super::{assisted_info, require_rubric, Judge, RowFailurePolicy, ANSWER_COLUMNS};
use crate::runner::generate_text;

pub const FREE_FORM_SYSTEM_PROMPT: &str = "You are an impartial evaluation assistant that scores model \
answers based on explicit criteria. Be concise, neutral, and consistent.";

fn score_pattern() -> &'static Regex {
    static SCORE: OnceLock<Regex> = OnceLock::new();
    SCORE.get_or_init(|| Regex::new(r"Score:\s*(\d+)").expect("static score pattern"))
}

fn reasoning_pattern() -> &'static Regex {
    static REASONING: OnceLock<Regex> = OnceLock::new();
    REASONING.get_or_init(|| Regex::new(r"(?s)Reasoning:\s*(.*)").expect("static reasoning pattern"))
}

/// Scores answers 0-10 against free-form criteria and keeps the judge's reasoning.
///
/// A reply without a `Score:` line scores 0 with empty reasoning instead of
/// being left missing.
pub struct FreeFormJudge {
    model: Arc<dyn TextGenerator>,
    rubric: String,
}

impl FreeFormJudge {
    pub fn new(model: Arc<dyn TextGenerator>, rubric: &str) -> Result<Self> {
        Ok(Self {
            model,
            rubric: require_rubric(rubric, JudgeKind::FreeForm)?,
        })
    }

    pub fn rubric(&self) -> &str {
        &self.rubric
    }

    pub fn scoring_prompt(rubric: &str, model_answer: &str) -> String {
        format!(
            "Evaluate how well the following answer satisfies the evaluation criteria.\n\n\
             Evaluation Prompt (criteria):\n{rubric}\n\n\
             Model's Answer:\n{model_answer}\n\n\
             Scoring Rules:\n\
             - 10 = Perfectly satisfies the evaluation criteria\n\
             - 7-9 = Mostly satisfies with minor issues\n\
             - 4-6 = Partially satisfies the criteria\n\
             - 1-3 = Weakly satisfies or largely off-target\n\
             - 0 = Completely fails to satisfy\n\n\
             Provide your evaluation in this EXACT format:\n\
             Score: [integer between 0 and 10]\n\
             Reasoning: [brief explanation of your scoring decision]\n"
        )
    }

    /// `(score, reasoning)` from a reply; the score is clamped into 0-10.
    pub fn parse_reply(reply: &str) -> (f64, String) {
        let reply = reply.trim();
        let reasoning = reasoning_pattern()
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let score = score_pattern()
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .map(|m| {
                // Digit runs too long for u32 are still far above the ceiling.
                m.as_str().parse::<u32>().unwrap_or(u32::MAX).min(10)
            });

        match score {
            Some(score) => (f64::from(score), reasoning),
            None => {
                tracing::warn!("Could not parse score from free-form judge reply: {:?}", reply);
                (0.0, String::new())
            }
        }
    }
}

#[async_trait]
impl Judge for FreeFormJudge {
    fn kind(&self) -> JudgeKind {
        JudgeKind::FreeForm
    }

    fn required_columns(&self) -> &'static [Column] {
        ANSWER_COLUMNS
    }

    fn failure_policy(&self) -> RowFailurePolicy {
        RowFailurePolicy::Abort
    }

    fn info(&self, invalid_count: usize) -> JudgeInfo {
        assisted_info(self.kind(), self.model.as_ref(), Some(&self.rubric), invalid_count)
    }

    async fn check_single_answer(&self, row: &ResultRow) -> Result<Verdict> {
        let prompt = Self::scoring_prompt(&self.rubric, &row.model_answer);
        let reply = generate_text(
            self.model.as_ref(),
            GenerationRequest::new(prompt, FREE_FORM_SYSTEM_PROMPT),
        )
        .await?;

        let (score, reasoning) = Self::parse_reply(&reply);
        tracing::debug!("Free-form score={} reasoning={:.50}", score, reasoning);
        Ok(Verdict::Score {
            score: Some(score),
            reasoning: Some(reasoning),
        })
    }
}
