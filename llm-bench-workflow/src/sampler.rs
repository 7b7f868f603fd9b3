use llm_bench_core::{BenchError, Result, SampledRow, Task, TaskKind};
use llm_bench_storage::{load_dataset, Record};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::path::Path;

/// Dataset columns a task kind cannot run without.
pub fn required_columns(kind: TaskKind) -> &'static [&'static str] {
    match kind {
        TaskKind::MultipleChoice => &["question", "options", "answer"],
        TaskKind::StringBased => &["question", "answer"],
        TaskKind::PromptBased => &["question"],
    }
}

/// Indices drawn from `0..population`.
///
/// Without replacement the draw is a uniform subset in random order; with
/// replacement each position is drawn independently. The same seed always
/// yields the same indices in the same order.
pub fn draw_indices(population: usize, amount: usize, seed: Option<u64>, replace: bool) -> Vec<usize> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if replace {
        (0..amount).map(|_| rng.gen_range(0..population)).collect()
    } else {
        rand::seq::index::sample(&mut rng, population, amount).into_vec()
    }
}

/// Loads the dataset and returns `sample_size` records.
///
/// Checks run in order: positive size, load, required columns, non-empty
/// dataset, and size within the dataset unless `replace` is set.
pub fn sample_dataset(
    path: &Path,
    sample_size: usize,
    seed: Option<u64>,
    required: &[&str],
    replace: bool,
) -> Result<Vec<Record>> {
    if sample_size == 0 {
        return Err(BenchError::DatasetLoad("sample_size must be > 0".to_string()));
    }

    let dataset = load_dataset(path)?;

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !dataset.has_column(column))
        .collect();
    if !missing.is_empty() {
        return Err(BenchError::Configuration(format!(
            "Missing required column(s): {:?}. Available: {:?}",
            missing, dataset.columns
        )));
    }

    if dataset.is_empty() {
        return Err(BenchError::DatasetLoad(format!(
            "Dataset {} is empty; cannot sample",
            dataset.name
        )));
    }

    if !replace && sample_size > dataset.len() {
        return Err(BenchError::DatasetLoad(format!(
            "sample_size ({}) > dataset size ({}); enable replacement to draw more rows than available",
            sample_size,
            dataset.len()
        )));
    }

    let indices = draw_indices(dataset.len(), sample_size, seed, replace);
    let sampled: Vec<Record> = indices
        .iter()
        .map(|&idx| dataset.records[idx].clone())
        .collect();

    tracing::info!(
        "Sampled {}/{} rows from {} (replace={}, seed={:?})",
        sampled.len(),
        dataset.len(),
        dataset.name,
        replace,
        seed
    );
    Ok(sampled)
}

/// Draws the task's sample and converts it into typed rows.
pub fn sample_rows(task: &Task) -> Result<Vec<SampledRow>> {
    let records = sample_dataset(
        task.dataset_path(),
        task.sample_size(),
        task.seed(),
        required_columns(task.kind()),
        task.replace(),
    )?;

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            to_sampled_row(task.kind(), &record)
                .map_err(|err| err.with_context(format!("sampled row {}", idx)))
        })
        .collect()
}

fn to_sampled_row(kind: TaskKind, record: &Record) -> Result<SampledRow> {
    let question = cell_text(record.get("question"))
        .ok_or_else(|| BenchError::DatasetLoad("missing 'question' value".to_string()))?;

    let options = match kind {
        TaskKind::MultipleChoice => {
            let options = record.get("options").and_then(parse_options).ok_or_else(|| {
                BenchError::DatasetLoad("multiple-choice row has no parsable 'options'".to_string())
            })?;
            Some(options)
        }
        TaskKind::StringBased | TaskKind::PromptBased => None,
    };

    Ok(SampledRow {
        question_id: cell_text(record.get("question_id")),
        question,
        options,
        answer: cell_text(record.get("answer")),
        category: cell_text(record.get("category")),
    })
}

/// Scalar cell as text; `None` for missing, null and blank cells.
fn cell_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Options given as a JSON array, a string holding a JSON array, or a
/// `||`-separated string.
pub fn parse_options(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(parsed @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed) {
                return parse_options(&parsed);
            }
            if trimmed.contains("||") {
                let parts: Vec<String> = trimmed
                    .split("||")
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect();
                return (!parts.is_empty()).then_some(parts);
            }
            None
        }
        _ => None,
    }
}
