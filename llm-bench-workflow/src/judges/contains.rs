use async_trait::async_trait;
use caseless::default_case_fold_str;
use llm_bench_core::{BenchError, Column, JudgeKind, ResultRow, Result, Verdict};
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use super::{Judge, RowFailurePolicy, REFERENCE_COLUMNS};

fn punctuation() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s’']").expect("static punctuation pattern"))
}

/// NFKC, full Unicode case folding, punctuation (apostrophes excepted) to
/// spaces, and whitespace collapsed to single spaces.
pub fn normalize_text(text: &str) -> String {
    let folded = default_case_fold_str(&text.nfkc().collect::<String>());
    let stripped = punctuation().replace_all(&folded, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Passes when the normalized reference occurs inside the normalized answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainsJudge;

#[async_trait]
impl Judge for ContainsJudge {
    fn kind(&self) -> JudgeKind {
        JudgeKind::Contains
    }

    fn required_columns(&self) -> &'static [Column] {
        REFERENCE_COLUMNS
    }

    fn failure_policy(&self) -> RowFailurePolicy {
        RowFailurePolicy::Abort
    }

    async fn check_single_answer(&self, row: &ResultRow) -> Result<Verdict> {
        let truth = row
            .true_answer
            .as_deref()
            .map(normalize_text)
            .unwrap_or_default();
        if truth.is_empty() {
            return Err(BenchError::Evaluation(
                "true_answer cannot be empty for the contains judge".to_string(),
            ));
        }

        let answer = normalize_text(&row.model_answer);
        let passed = answer.contains(&truth);
        tracing::debug!("Contains check: '{}' in '{}' -> {}", truth, answer, passed);
        Ok(Verdict::correct(passed))
    }
}
