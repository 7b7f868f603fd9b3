mod common;

use common::*;
use llm_bench_core::{BenchError, ModelIdentity, Task, TaskKind};
use llm_bench_workflow::prompt::DEFAULT_SYSTEM_PROMPT;
use llm_bench_workflow::runner::{measured_indices, Runner};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

fn capitals_model() -> ScriptedModel {
    ScriptedModel::new(&[
        ("Capital of France?", "Paris"),
        ("Capital of Germany?", "It is Munich"),
        ("Capital of Italy?", "Rome, of course"),
    ])
}

// ===== Latency Subset =====

#[test]
fn test_measured_indices_are_bounded_and_reproducible() {
    let first = measured_indices(Some(42), 10, 4);
    assert_eq!(first.len(), 4);
    assert!(first.iter().all(|&idx| idx < 10));
    assert_eq!(first, measured_indices(Some(42), 10, 4));

    assert_eq!(measured_indices(Some(42), 3, 25).len(), 3);
    assert!(measured_indices(Some(42), 0, 5).is_empty());
    assert!(measured_indices(Some(42), 5, 0).is_empty());
}

// ===== Runs =====

#[tokio::test]
async fn test_run_produces_one_row_per_sample() {
    let dir = TempDir::new().unwrap();
    let path = capitals_csv(&dir);
    let model = Arc::new(capitals_model());
    let task = Task::new(TaskKind::StringBased, &path, 3).unwrap().with_seed(42);

    let (metadata, table) = Runner::new(model.clone()).run(&task).await.unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(metadata.sample_size, 3);
    assert_eq!(metadata.seed, Some(42));
    assert_eq!(metadata.model_name, "scripted-model");
    assert_eq!(metadata.dataset_name, "capitals.csv");
    assert_eq!(metadata.system_instruction, DEFAULT_SYSTEM_PROMPT);
    assert_eq!(metadata.measured_count, 3);
    assert!(metadata.latency_ms_avg.is_some());
    assert!(metadata.judge.is_none());

    for row in table.rows() {
        assert!(row.true_answer.is_some());
        assert_eq!(row.category.as_deref(), Some("europe"));
    }
    assert_eq!(model.prompts().len(), 3);
}

#[tokio::test]
async fn test_same_seed_asks_in_same_order() {
    let dir = TempDir::new().unwrap();
    let path = capitals_csv(&dir);
    let task = Task::new(TaskKind::StringBased, &path, 3).unwrap().with_seed(9);

    let first = Arc::new(capitals_model());
    let second = Arc::new(capitals_model());
    Runner::new(first.clone()).run(&task).await.unwrap();
    Runner::new(second.clone()).run(&task).await.unwrap();

    assert_eq!(first.prompts(), second.prompts());
}

#[tokio::test]
async fn test_measure_k_limits_timed_calls() {
    let dir = TempDir::new().unwrap();
    let path = capitals_csv(&dir);
    let task = Task::new(TaskKind::StringBased, &path, 3).unwrap().with_seed(1);

    let (metadata, _) = Runner::new(Arc::new(capitals_model()))
        .with_measure_k(1)
        .run(&task)
        .await
        .unwrap();
    assert_eq!(metadata.measured_count, 1);

    let (metadata, _) = Runner::new(Arc::new(capitals_model()))
        .with_measure_k(0)
        .run(&task)
        .await
        .unwrap();
    assert_eq!(metadata.measured_count, 0);
    assert_eq!(metadata.latency_ms_avg, None);
}

#[tokio::test]
async fn test_instruction_is_appended_to_prompts() {
    let dir = TempDir::new().unwrap();
    let path = capitals_csv(&dir);
    let model = Arc::new(capitals_model());
    let task = Task::new(TaskKind::StringBased, &path, 1)
        .unwrap()
        .with_instruction("One word only.");

    Runner::new(model.clone()).run(&task).await.unwrap();

    let prompts = model.prompts();
    assert!(prompts[0].ends_with("\nOne word only."), "{}", prompts[0]);
}

#[tokio::test]
async fn test_identity_system_prompt_overrides_default() {
    let dir = TempDir::new().unwrap();
    let path = capitals_csv(&dir);
    let task = Task::new(TaskKind::PromptBased, &path, 1).unwrap();

    let mut mock = MockGenerator::new();
    mock.expect_identity()
        .returning(|| ModelIdentity::new("mock").with_system_prompt("Be brief."));
    mock.expect_generate()
        .withf(|request| request.system_instruction == "Be brief.")
        .times(1)
        .returning(|_| Ok("ok".to_string()));

    let (metadata, _) = Runner::new(Arc::new(mock)).run(&task).await.unwrap();
    assert_eq!(metadata.system_instruction, "Be brief.");
}

#[tokio::test]
async fn test_model_failure_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let path = capitals_csv(&dir);
    let task = Task::new(TaskKind::StringBased, &path, 3).unwrap().with_seed(3);

    let mut mock = MockGenerator::new();
    mock.expect_identity().returning(|| ModelIdentity::new("mock"));
    mock.expect_generate()
        .times(1)
        .returning(|_| Err(BenchError::Model("connection refused".to_string())));

    let err = Runner::new(Arc::new(mock)).run(&task).await.unwrap_err();
    match err {
        BenchError::Model(msg) => {
            assert!(msg.contains("row 0"), "{msg}");
            assert!(msg.contains("connection refused"), "{msg}");
        }
        other => panic!("expected a model error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_answer_is_a_model_error() {
    let dir = TempDir::new().unwrap();
    let path = capitals_csv(&dir);
    let task = Task::new(TaskKind::StringBased, &path, 1).unwrap();

    let mut mock = MockGenerator::new();
    mock.expect_identity().returning(|| ModelIdentity::new("mock"));
    mock.expect_generate().returning(|_| Ok("   ".to_string()));

    let err = Runner::new(Arc::new(mock)).run(&task).await.unwrap_err();
    assert!(matches!(err, BenchError::Model(_)));
}
