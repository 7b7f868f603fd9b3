use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

use super::ids::TaskId;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    MultipleChoice,
    StringBased,
    PromptBased,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::MultipleChoice => "multiple_choice",
            TaskKind::StringBased => "string_based",
            TaskKind::PromptBased => "prompt_based",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_dataset_path(path: &PathBuf) -> std::result::Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_dataset_path"));
    }
    Ok(())
}

/// One benchmark: what to sample, how much, and what to tell the model.
///
/// Fields are only reachable through getters; the `with_*` methods consume the
/// task and return a new one, so a constructed task is never mutated in place.
#[derive(Debug, Clone, Serialize, PartialEq, Validate)]
pub struct Task {
    id: TaskId,
    kind: TaskKind,
    #[validate(custom(function = "validate_dataset_path"))]
    dataset_path: PathBuf,
    #[validate(range(min = 1))]
    sample_size: usize,
    seed: Option<u64>,
    instruction: Option<String>,
    replace: bool,
    created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(kind: TaskKind, dataset_path: impl Into<PathBuf>, sample_size: usize) -> Result<Self> {
        let task = Self {
            id: TaskId::generate(),
            kind,
            dataset_path: dataset_path.into(),
            sample_size,
            seed: None,
            instruction: None,
            replace: false,
            created_at: Utc::now(),
        };
        task.validate()?;
        Ok(task)
    }

    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Instruction text for free-text kinds, rubric text for prompt-based ones.
    /// Plain data: it is appended to prompts, never interpreted.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        let instruction = instruction.into();
        self.instruction = if instruction.trim().is_empty() {
            None
        } else {
            Some(instruction)
        };
        self
    }

    /// Opt in to sampling with replacement.
    pub fn with_replacement(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// File name of the dataset, used as the dataset name in run metadata.
    pub fn dataset_name(&self) -> String {
        self.dataset_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dataset_path.display().to_string())
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    pub fn replace(&self) -> bool {
        self.replace
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
