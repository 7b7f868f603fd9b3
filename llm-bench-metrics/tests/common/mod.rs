#![allow(dead_code)]

use chrono::Utc;
use llm_bench_core::*;
use serde_json::json;

pub fn result_row(model_answer: &str, true_answer: Option<&str>) -> ResultRow {
    ResultRow {
        question_id: None,
        question: "question".to_string(),
        options: None,
        model_answer: model_answer.to_string(),
        true_answer: true_answer.map(str::to_string),
        category: None,
    }
}

pub fn boolean_table(flags: &[Option<bool>]) -> JudgedTable {
    let rows = flags
        .iter()
        .map(|flag| JudgedRow {
            result: result_row("answer", Some("answer")),
            verdict: Verdict::IsCorrect(*flag),
        })
        .collect();
    JudgedTable::new(ScoringColumn::IsCorrect, rows).unwrap()
}

pub fn categorized_table(rows: &[(&str, bool)]) -> JudgedTable {
    let rows = rows
        .iter()
        .map(|(category, flag)| {
            let mut result = result_row("answer", Some("answer"));
            result.category = Some(category.to_string());
            JudgedRow {
                result,
                verdict: Verdict::correct(*flag),
            }
        })
        .collect();
    JudgedTable::new(ScoringColumn::IsCorrect, rows).unwrap()
}

pub fn score_table(scores: &[Option<f64>]) -> JudgedTable {
    let rows = scores
        .iter()
        .map(|score| JudgedRow {
            result: result_row("answer", None),
            verdict: Verdict::Score {
                score: *score,
                reasoning: None,
            },
        })
        .collect();
    JudgedTable::new(ScoringColumn::Score, rows).unwrap()
}

/// Multiple-choice rows with two options each.
pub fn mc_table(true_answers: &[&str], model_answers: &[&str]) -> JudgedTable {
    let rows = true_answers
        .iter()
        .zip(model_answers)
        .map(|(truth, answer)| {
            let mut result = result_row(answer, Some(truth));
            result.options = Some(vec!["first".to_string(), "second".to_string()]);
            JudgedRow {
                result,
                verdict: Verdict::correct(truth.eq_ignore_ascii_case(answer)),
            }
        })
        .collect();
    JudgedTable::new(ScoringColumn::IsCorrect, rows).unwrap()
}

pub fn metadata() -> RunMetadata {
    RunMetadata {
        run_id: RunId::generate(),
        task_id: TaskId::from("task"),
        task_kind: TaskKind::StringBased,
        created_at: Utc::now(),
        dataset_path: "data.csv".to_string(),
        dataset_name: "data.csv".to_string(),
        sample_size: 1,
        seed: Some(1),
        replace: false,
        system_instruction: String::new(),
        instruction: None,
        model_name: "model".to_string(),
        model_params: json!({}),
        measured_count: 0,
        latency_ms_avg: None,
        judge: None,
    }
}
