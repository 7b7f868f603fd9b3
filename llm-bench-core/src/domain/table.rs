use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BenchError, Result};

/// A dataset row after sampling; read-only from here on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampledRow {
    pub question_id: Option<String>,
    pub question: String,
    /// Present only for multiple-choice datasets.
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
    pub category: Option<String>,
}

/// A sampled row plus the answer the model under test produced for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRow {
    pub question_id: Option<String>,
    pub question: String,
    pub options: Option<Vec<String>>,
    pub model_answer: String,
    pub true_answer: Option<String>,
    pub category: Option<String>,
}

impl ResultRow {
    pub fn from_sample(row: SampledRow, model_answer: String) -> Self {
        Self {
            question_id: row.question_id,
            question: row.question,
            options: row.options,
            model_answer,
            true_answer: row.answer,
            category: row.category,
        }
    }

    pub fn has(&self, column: Column) -> bool {
        match column {
            Column::QuestionId => self.question_id.is_some(),
            Column::Question => true,
            Column::Options => self.options.is_some(),
            Column::ModelAnswer => true,
            Column::TrueAnswer => self.true_answer.is_some(),
            Column::Category => self.category.is_some(),
        }
    }
}

/// Columns of the raw results table, in artifact order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    QuestionId,
    Question,
    Options,
    ModelAnswer,
    TrueAnswer,
    Category,
}

impl Column {
    pub const RESULTS: [Column; 5] = [
        Column::QuestionId,
        Column::Question,
        Column::Options,
        Column::ModelAnswer,
        Column::TrueAnswer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::QuestionId => "question_id",
            Column::Question => "question",
            Column::Options => "options",
            Column::ModelAnswer => "model_answer",
            Column::TrueAnswer => "true_answer",
            Column::Category => "category",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A required column that some rows have no value for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    pub column: Column,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_category(&self) -> bool {
        self.rows.iter().any(|row| row.category.is_some())
    }

    pub fn missing_columns(&self, required: &[Column]) -> Vec<MissingColumn> {
        required
            .iter()
            .filter_map(|&column| {
                let rows: Vec<usize> = self
                    .rows
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| !row.has(column))
                    .map(|(idx, _)| idx)
                    .collect();
                (!rows.is_empty()).then_some(MissingColumn { column, rows })
            })
            .collect()
    }

    /// Fails with an evaluation error naming every missing column.
    pub fn require_columns(&self, required: &[Column]) -> Result<()> {
        let missing = self.missing_columns(required);
        if missing.is_empty() {
            return Ok(());
        }

        let described: Vec<String> = missing
            .iter()
            .map(|m| format!("'{}' (rows without a value: {:?})", m.column, m.rows))
            .collect();
        Err(BenchError::Evaluation(format!(
            "Missing required column(s): {}",
            described.join(", ")
        )))
    }
}

/// The single scoring column a judge family adds to the table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoringColumn {
    IsCorrect,
    Score,
}

impl ScoringColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringColumn::IsCorrect => "is_correct",
            ScoringColumn::Score => "score",
        }
    }
}

impl fmt::Display for ScoringColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row's judgment. `None` is the missing-value sentinel for rows the judge
/// could not evaluate; the row itself is always kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    IsCorrect(Option<bool>),
    Score {
        score: Option<f64>,
        reasoning: Option<String>,
    },
}

impl Verdict {
    pub fn correct(passed: bool) -> Self {
        Verdict::IsCorrect(Some(passed))
    }

    pub fn score(score: f64) -> Self {
        Verdict::Score {
            score: Some(score),
            reasoning: None,
        }
    }

    pub fn missing(column: ScoringColumn) -> Self {
        match column {
            ScoringColumn::IsCorrect => Verdict::IsCorrect(None),
            ScoringColumn::Score => Verdict::Score {
                score: None,
                reasoning: None,
            },
        }
    }

    pub fn column(&self) -> ScoringColumn {
        match self {
            Verdict::IsCorrect(_) => ScoringColumn::IsCorrect,
            Verdict::Score { .. } => ScoringColumn::Score,
        }
    }

    /// Numeric coercion of the scoring value; `None` when it is missing or not finite.
    pub fn value(&self) -> Option<f64> {
        match self {
            Verdict::IsCorrect(Some(true)) => Some(1.0),
            Verdict::IsCorrect(Some(false)) => Some(0.0),
            Verdict::IsCorrect(None) => None,
            Verdict::Score { score, .. } => score.filter(|s| s.is_finite()),
        }
    }

    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Verdict::Score { reasoning, .. } => reasoning.as_deref(),
            Verdict::IsCorrect(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgedRow {
    #[serde(flatten)]
    pub result: ResultRow,
    pub verdict: Verdict,
}

/// Result table plus exactly one scoring column, present on every row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JudgedTable {
    column: ScoringColumn,
    rows: Vec<JudgedRow>,
}

impl JudgedTable {
    pub fn new(column: ScoringColumn, rows: Vec<JudgedRow>) -> Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.verdict.column() != column)
        {
            return Err(BenchError::Evaluation(format!(
                "Row {} carries a '{}' verdict in a '{}' table",
                idx,
                row.verdict.column(),
                column
            )));
        }
        Ok(Self { column, rows })
    }

    pub fn column(&self) -> ScoringColumn {
        self.column
    }

    pub fn rows(&self) -> &[JudgedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_category(&self) -> bool {
        self.rows.iter().any(|row| row.result.category.is_some())
    }

    /// Rows the judge could not evaluate.
    pub fn invalid_count(&self) -> usize {
        self.rows.iter().filter(|row| row.verdict.value().is_none()).count()
    }

    pub fn require_column(&self, column: ScoringColumn) -> Result<()> {
        if self.column != column {
            return Err(BenchError::Evaluation(format!(
                "Missing required column: '{}' (table carries '{}')",
                column, self.column
            )));
        }
        Ok(())
    }
}
