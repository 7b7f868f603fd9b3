use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Dataset load error: {0}")]
    DatasetLoad(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BenchError {
    /// Stable tag for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            BenchError::DatasetLoad(_) => "dataset_load",
            BenchError::Configuration(_) => "configuration",
            BenchError::Model(_) => "model",
            BenchError::Evaluation(_) => "evaluation",
            BenchError::Storage(_) => "storage",
            BenchError::Serialization(_) => "serialization",
        }
    }

    /// Prefixes the message with `context`, keeping the error kind.
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        match self {
            BenchError::DatasetLoad(msg) => BenchError::DatasetLoad(format!("{context}: {msg}")),
            BenchError::Configuration(msg) => {
                BenchError::Configuration(format!("{context}: {msg}"))
            }
            BenchError::Model(msg) => BenchError::Model(format!("{context}: {msg}")),
            BenchError::Evaluation(msg) => BenchError::Evaluation(format!("{context}: {msg}")),
            BenchError::Storage(msg) => BenchError::Storage(format!("{context}: {msg}")),
            BenchError::Serialization(msg) => {
                BenchError::Serialization(format!("{context}: {msg}"))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for BenchError {
    fn from(err: validator::ValidationErrors) -> Self {
        BenchError::Configuration(err.to_string())
    }
}
