use llm_bench_core::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn result_row(model_answer: &str, true_answer: Option<&str>) -> ResultRow {
    ResultRow {
        question_id: None,
        question: "What is the capital of France?".to_string(),
        options: None,
        model_answer: model_answer.to_string(),
        true_answer: true_answer.map(str::to_string),
        category: None,
    }
}

// ===== Task Tests =====

#[test]
fn test_task_creation() {
    let task = Task::new(TaskKind::StringBased, "data/capitals.csv", 3)
        .unwrap()
        .with_seed(42)
        .with_instruction("Answer with the city name only.");

    assert_eq!(task.kind(), TaskKind::StringBased);
    assert_eq!(task.sample_size(), 3);
    assert_eq!(task.seed(), Some(42));
    assert_eq!(task.instruction(), Some("Answer with the city name only."));
    assert_eq!(task.dataset_name(), "capitals.csv");
    assert!(!task.replace());
}

#[test]
fn test_task_rejects_zero_sample_size() {
    let err = Task::new(TaskKind::MultipleChoice, "data/mc.csv", 0).unwrap_err();
    assert!(matches!(err, BenchError::Configuration(_)));
    assert_eq!(err.kind(), "configuration");
}

#[test]
fn test_task_rejects_empty_dataset_path() {
    let err = Task::new(TaskKind::PromptBased, "", 5).unwrap_err();
    assert!(matches!(err, BenchError::Configuration(_)));
}

#[test]
fn test_blank_instruction_is_dropped() {
    let task = Task::new(TaskKind::StringBased, "d.csv", 1)
        .unwrap()
        .with_instruction("   ");
    assert_eq!(task.instruction(), None);
}

#[test]
fn test_task_ids_are_generated() {
    let a = Task::new(TaskKind::StringBased, "d.csv", 1).unwrap();
    let b = Task::new(TaskKind::StringBased, "d.csv", 1).unwrap();
    assert_ne!(a.id(), b.id());

    let named = a.with_id("capitals-v1");
    assert_eq!(named.id().as_str(), "capitals-v1");
}

// ===== Result Table Tests =====

#[test]
fn test_result_row_from_sample() {
    let sample = SampledRow {
        question_id: Some("q1".to_string()),
        question: "2 + 2?".to_string(),
        options: Some(vec!["3".to_string(), "4".to_string()]),
        answer: Some("B".to_string()),
        category: Some("math".to_string()),
    };

    let row = ResultRow::from_sample(sample, "B".to_string());

    assert_eq!(row.question_id.as_deref(), Some("q1"));
    assert_eq!(row.true_answer.as_deref(), Some("B"));
    assert_eq!(row.model_answer, "B");
    assert_eq!(row.category.as_deref(), Some("math"));
}

#[test]
fn test_missing_columns_lists_offending_rows() {
    let table = ResultTable::new(vec![
        result_row("Paris", Some("Paris")),
        result_row("Lyon", None),
        result_row("Nice", None),
    ]);

    let missing = table.missing_columns(&[Column::ModelAnswer, Column::TrueAnswer]);

    assert_eq!(
        missing,
        vec![MissingColumn {
            column: Column::TrueAnswer,
            rows: vec![1, 2],
        }]
    );
}

#[test]
fn test_require_columns_names_the_column() {
    let table = ResultTable::new(vec![result_row("Paris", None)]);

    let err = table
        .require_columns(&[Column::ModelAnswer, Column::TrueAnswer])
        .unwrap_err();

    assert!(matches!(err, BenchError::Evaluation(_)));
    assert!(err.to_string().contains("true_answer"));
}

#[test]
fn test_require_columns_passes_when_present() {
    let table = ResultTable::new(vec![result_row("Paris", Some("Paris"))]);
    assert!(table.require_columns(&[Column::TrueAnswer]).is_ok());
}

// ===== Verdict / Judged Table Tests =====

#[rstest]
#[case(Verdict::correct(true), Some(1.0))]
#[case(Verdict::correct(false), Some(0.0))]
#[case(Verdict::missing(ScoringColumn::IsCorrect), None)]
#[case(Verdict::score(7.5), Some(7.5))]
#[case(Verdict::missing(ScoringColumn::Score), None)]
#[case(Verdict::Score { score: Some(f64::NAN), reasoning: None }, None)]
fn test_verdict_value(#[case] verdict: Verdict, #[case] expected: Option<f64>) {
    assert_eq!(verdict.value(), expected);
}

#[test]
fn test_judged_table_rejects_mixed_columns() {
    let rows = vec![
        JudgedRow {
            result: result_row("Paris", Some("Paris")),
            verdict: Verdict::correct(true),
        },
        JudgedRow {
            result: result_row("Lyon", Some("Paris")),
            verdict: Verdict::score(3.0),
        },
    ];

    let err = JudgedTable::new(ScoringColumn::IsCorrect, rows).unwrap_err();
    assert!(err.to_string().contains("Row 1"));
}

#[test]
fn test_judged_table_counts_invalid_rows() {
    let rows = vec![
        JudgedRow {
            result: result_row("Paris", Some("Paris")),
            verdict: Verdict::correct(true),
        },
        JudgedRow {
            result: result_row("???", Some("Paris")),
            verdict: Verdict::missing(ScoringColumn::IsCorrect),
        },
    ];

    let table = JudgedTable::new(ScoringColumn::IsCorrect, rows).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.invalid_count(), 1);
    assert!(table.require_column(ScoringColumn::IsCorrect).is_ok());
    assert!(table.require_column(ScoringColumn::Score).is_err());
}

// ===== Strategy Defaults =====

#[rstest]
#[case(TaskKind::MultipleChoice, EvaluatorKind::MultipleChoice)]
#[case(TaskKind::StringBased, EvaluatorKind::StringMatch)]
#[case(TaskKind::PromptBased, EvaluatorKind::RubricDistribution)]
fn test_default_evaluator_per_task_kind(#[case] kind: TaskKind, #[case] expected: EvaluatorKind) {
    assert_eq!(EvaluatorKind::default_for(kind), expected);
}

#[test]
fn test_evaluator_required_columns() {
    assert_eq!(
        EvaluatorKind::BooleanAccuracy.required_column(),
        ScoringColumn::IsCorrect
    );
    assert_eq!(
        EvaluatorKind::ScoreSummary.required_column(),
        ScoringColumn::Score
    );
    assert_eq!(
        EvaluatorKind::RubricDistribution.required_column(),
        ScoringColumn::Score
    );
}

#[test]
fn test_model_assisted_judges() {
    assert!(!JudgeKind::Exact.is_model_assisted());
    assert!(!JudgeKind::Structural.is_model_assisted());
    assert!(JudgeKind::Semantic.is_model_assisted());
    assert!(JudgeKind::FreeForm.is_model_assisted());
}
