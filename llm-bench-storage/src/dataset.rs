//! Tabular dataset loading, dispatched on file extension.

use llm_bench_core::{BenchError, Result};
use parquet::file::reader::{FileReader, SerializedFileReader};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// One dataset row: column name to cell value. Missing cells are `Value::Null`.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Parquet,
    Json,
    JsonLines,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(DatasetFormat::Csv),
            "parquet" => Ok(DatasetFormat::Parquet),
            "json" => Ok(DatasetFormat::Json),
            "jsonl" => Ok(DatasetFormat::JsonLines),
            other => Err(BenchError::DatasetLoad(format!(
                "Unsupported dataset format '{}' for {} (expected csv, parquet, json or jsonl)",
                other,
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub path: PathBuf,
    pub format: DatasetFormat,
    /// Column names in file order.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

fn load_error(path: &Path, err: impl std::fmt::Display) -> BenchError {
    BenchError::DatasetLoad(format!("{}: {}", path.display(), err))
}

pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)?;

    if !path.is_file() {
        return Err(BenchError::DatasetLoad(format!(
            "Dataset file not found: {}",
            path.display()
        )));
    }

    let (columns, records) = match format {
        DatasetFormat::Csv => read_csv(path)?,
        DatasetFormat::Parquet => read_parquet(path)?,
        DatasetFormat::Json => read_json(path)?,
        DatasetFormat::JsonLines => read_json_lines(path)?,
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::info!(
        "Loaded dataset: name={}, format={:?}, rows={}, columns={}",
        name,
        format,
        records.len(),
        columns.len()
    );

    Ok(Dataset {
        name,
        path: path.to_path_buf(),
        format,
        columns,
        records,
    })
}

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| load_error(path, e))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| load_error(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(|e| load_error(path, format!("row {}: {}", line, e)))?;
        let record: Record = columns
            .iter()
            .zip(row.iter())
            .map(|(column, cell)| {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                (column.clone(), value)
            })
            .collect();
        records.push(record);
    }

    Ok((columns, records))
}

fn read_parquet(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let file = File::open(path).map_err(|e| load_error(path, e))?;
    let reader = SerializedFileReader::new(file).map_err(|e| load_error(path, e))?;

    let columns: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema()
        .get_fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.get_row_iter(None).map_err(|e| load_error(path, e))? {
        let row = row.map_err(|e| load_error(path, e))?;
        match row.to_json_value() {
            Value::Object(record) => records.push(record),
            other => {
                return Err(load_error(path, format!("expected a row object, got {}", other)))
            }
        }
    }

    Ok((columns, records))
}

fn read_json(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let text = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| load_error(path, e))?;

    let Value::Array(items) = value else {
        return Err(load_error(path, "expected a top-level array of objects"));
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(record) => Ok(record),
            _ => Err(load_error(path, format!("element {} is not an object", idx))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((columns_of(&records), records))
}

fn read_json_lines(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let text = fs::read_to_string(path).map_err(|e| load_error(path, e))?;

    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => records.push(record),
            Ok(_) => return Err(load_error(path, format!("line {} is not an object", idx + 1))),
            Err(e) => return Err(load_error(path, format!("line {}: {}", idx + 1, e))),
        }
    }

    Ok((columns_of(&records), records))
}

/// Union of keys, in first-seen order.
fn columns_of(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}
