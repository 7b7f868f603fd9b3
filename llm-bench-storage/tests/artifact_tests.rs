use chrono::Utc;
use llm_bench_core::*;
use llm_bench_storage::{write_judged_csv, write_report_json, ArtifactRecord, ArtifactRepository};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn result_row(answer: &str, category: Option<&str>) -> ResultRow {
    ResultRow {
        question_id: Some("q1".to_string()),
        question: "Pick one".to_string(),
        options: Some(vec!["yes".to_string(), "no, never".to_string()]),
        model_answer: answer.to_string(),
        true_answer: Some("A".to_string()),
        category: category.map(str::to_string),
    }
}

fn metadata(run_id: &RunId) -> RunMetadata {
    RunMetadata {
        run_id: run_id.clone(),
        task_id: TaskId::from("t"),
        task_kind: TaskKind::MultipleChoice,
        created_at: Utc::now(),
        dataset_path: "mc.csv".to_string(),
        dataset_name: "mc.csv".to_string(),
        sample_size: 1,
        seed: None,
        replace: false,
        system_instruction: String::new(),
        instruction: None,
        model_name: "m".to_string(),
        model_params: json!({}),
        measured_count: 0,
        latency_ms_avg: None,
        judge: None,
    }
}

#[test]
fn test_run_directory_layout() {
    let root = TempDir::new().unwrap();
    let run_id = RunId::from("20250101000000-deadbeef");

    let repo = ArtifactRepository::create(root.path(), &run_id).unwrap();

    assert_eq!(repo.dir(), root.path().join("runs").join("20250101000000-deadbeef"));
    assert!(repo.dir().is_dir());
    assert!(repo
        .results_path()
        .ends_with("run_20250101000000-deadbeef.csv"));
    assert!(repo
        .judged_path()
        .ends_with("judge_20250101000000-deadbeef.csv"));
    assert!(repo
        .report_path()
        .ends_with("eval_20250101000000-deadbeef.json"));
}

#[test]
fn test_run_directory_is_claimed_once() {
    let root = TempDir::new().unwrap();
    let run_id = RunId::generate();

    ArtifactRepository::create(root.path(), &run_id).unwrap();
    let err = ArtifactRepository::create(root.path(), &run_id).unwrap_err();

    assert!(matches!(err, BenchError::Storage(_)));
}

#[test]
fn test_results_csv_shape() {
    let root = TempDir::new().unwrap();
    let repo = ArtifactRepository::create(root.path(), &RunId::generate()).unwrap();
    let table = ResultTable::new(vec![result_row("A", None)]);

    let record = repo.save_results(&table).unwrap();
    let text = fs::read_to_string(&record.path).unwrap();

    assert_eq!(
        text,
        "question_id,question,options,model_answer,true_answer\n\
         q1,Pick one,\"[\"\"yes\"\",\"\"no, never\"\"]\",A,A\n"
    );
    assert!(record.verify_checksum(text.as_bytes()));
    assert_eq!(record.size, text.len() as u64);
}

#[test]
fn test_results_csv_appends_category_when_present() {
    let root = TempDir::new().unwrap();
    let repo = ArtifactRepository::create(root.path(), &RunId::generate()).unwrap();
    let table = ResultTable::new(vec![result_row("A", Some("geo")), result_row("B", None)]);

    let record = repo.save_results(&table).unwrap();
    let text = fs::read_to_string(&record.path).unwrap();
    let header = text.lines().next().unwrap();

    assert!(header.ends_with(",category"));
}

#[test]
fn test_judged_csv_boolean_cells() {
    let root = TempDir::new().unwrap();
    let repo = ArtifactRepository::create(root.path(), &RunId::generate()).unwrap();
    let table = JudgedTable::new(
        ScoringColumn::IsCorrect,
        vec![
            JudgedRow {
                result: result_row("A", None),
                verdict: Verdict::correct(true),
            },
            JudgedRow {
                result: result_row("B", None),
                verdict: Verdict::correct(false),
            },
            JudgedRow {
                result: result_row("?", None),
                verdict: Verdict::missing(ScoringColumn::IsCorrect),
            },
        ],
    )
    .unwrap();

    let record = write_judged_csv(&repo.judged_path(), &table).unwrap();
    let mut reader = csv::Reader::from_path(&record.path).unwrap();

    let header = reader.headers().unwrap().clone();
    assert_eq!(header.iter().last(), Some("is_correct"));

    let flags: Vec<String> = reader
        .records()
        .map(|r| r.unwrap().iter().last().unwrap().to_string())
        .collect();
    assert_eq!(flags, vec!["1", "0", ""]);
}

#[test]
fn test_judged_csv_score_cells() {
    let root = TempDir::new().unwrap();
    let repo = ArtifactRepository::create(root.path(), &RunId::generate()).unwrap();
    let table = JudgedTable::new(
        ScoringColumn::Score,
        vec![JudgedRow {
            result: result_row("text", None),
            verdict: Verdict::Score {
                score: Some(7.5),
                reasoning: Some("mostly right".to_string()),
            },
        }],
    )
    .unwrap();

    let record = write_judged_csv(&repo.judged_path(), &table).unwrap();
    let mut reader = csv::Reader::from_path(&record.path).unwrap();
    let row = reader.records().next().unwrap().unwrap();

    assert_eq!(&row[5], "7.5");
    assert_eq!(&row[6], "mostly right");
}

#[test]
fn test_report_json_is_pretty_and_reads_back() {
    let root = TempDir::new().unwrap();
    let run_id = RunId::generate();
    let repo = ArtifactRepository::create(root.path(), &run_id).unwrap();
    let report = EvaluationReport {
        metadata: metadata(&run_id),
        out: EvaluationOutput::new(EvaluatorKind::BooleanAccuracy, 1, 1)
            .with_metric("accuracy", Some(1.0)),
    };

    let record: ArtifactRecord = write_report_json(&repo.report_path(), &report).unwrap();
    let text = fs::read_to_string(&record.path).unwrap();

    assert!(text.contains("\n  \"metadata\""));
    let parsed: EvaluationReport = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, report);
    assert_eq!(record.content_type, "application/json");
}
