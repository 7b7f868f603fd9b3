//! Serializers for the three run artifacts.
//!
//! Each artifact is rendered fully in memory, written in one call and
//! checksummed from the same bytes, so a record always describes exactly
//! what landed on disk.

use csv::WriterBuilder;
use llm_bench_core::{
    BenchError, Column, EvaluationReport, JudgedTable, ResultRow, ResultTable, Result,
    ScoringColumn, Verdict,
};
use std::fs;
use std::path::Path;

use super::metadata::ArtifactRecord;

fn storage_error(path: &Path, err: impl std::fmt::Display) -> BenchError {
    BenchError::Storage(format!("{}: {}", path.display(), err))
}

fn persist(path: &Path, data: Vec<u8>) -> Result<ArtifactRecord> {
    fs::write(path, &data).map_err(|e| storage_error(path, e))?;
    let record = ArtifactRecord::new(path, &data);
    tracing::debug!(
        "Wrote artifact: path={}, size={}, checksum={}",
        record.path.display(),
        record.size,
        record.checksum
    );
    Ok(record)
}

fn result_header(with_category: bool) -> Vec<&'static str> {
    let mut header: Vec<&'static str> = Column::RESULTS.iter().map(Column::as_str).collect();
    if with_category {
        header.push(Column::Category.as_str());
    }
    header
}

fn result_cells(row: &ResultRow, with_category: bool) -> Result<Vec<String>> {
    let options = match &row.options {
        Some(options) => serde_json::to_string(options)?,
        None => String::new(),
    };

    let mut cells = vec![
        row.question_id.clone().unwrap_or_default(),
        row.question.clone(),
        options,
        row.model_answer.clone(),
        row.true_answer.clone().unwrap_or_default(),
    ];
    if with_category {
        cells.push(row.category.clone().unwrap_or_default());
    }
    Ok(cells)
}

fn verdict_cells(verdict: &Verdict) -> Vec<String> {
    match verdict {
        Verdict::IsCorrect(Some(true)) => vec!["1".to_string()],
        Verdict::IsCorrect(Some(false)) => vec!["0".to_string()],
        Verdict::IsCorrect(None) => vec![String::new()],
        Verdict::Score { score, reasoning } => vec![
            score.map(|s| s.to_string()).unwrap_or_default(),
            reasoning.clone().unwrap_or_default(),
        ],
    }
}

/// Raw results: `question_id, question, options, model_answer, true_answer[, category]`.
pub fn write_results_csv(path: &Path, table: &ResultTable) -> Result<ArtifactRecord> {
    let with_category = table.has_category();
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(result_header(with_category))
        .map_err(|e| storage_error(path, e))?;
    for row in table.rows() {
        writer
            .write_record(result_cells(row, with_category)?)
            .map_err(|e| storage_error(path, e))?;
    }

    let data = writer.into_inner().map_err(|e| storage_error(path, e))?;
    persist(path, data)
}

/// Raw results plus `is_correct`, or `score` and `reasoning`.
pub fn write_judged_csv(path: &Path, table: &JudgedTable) -> Result<ArtifactRecord> {
    let with_category = table.has_category();
    let mut header = result_header(with_category);
    match table.column() {
        ScoringColumn::IsCorrect => header.push("is_correct"),
        ScoringColumn::Score => header.extend(["score", "reasoning"]),
    }

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(&header)
        .map_err(|e| storage_error(path, e))?;
    for row in table.rows() {
        let mut cells = result_cells(&row.result, with_category)?;
        cells.extend(verdict_cells(&row.verdict));
        writer
            .write_record(&cells)
            .map_err(|e| storage_error(path, e))?;
    }

    let data = writer.into_inner().map_err(|e| storage_error(path, e))?;
    persist(path, data)
}

pub fn write_report_json(path: &Path, report: &EvaluationReport) -> Result<ArtifactRecord> {
    let data = serde_json::to_vec_pretty(report)?;
    persist(path, data)
}
