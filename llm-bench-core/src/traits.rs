use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// Who is answering: recorded in run metadata and judge sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelIdentity {
    pub name: String,
    /// Generation parameters as sent to the provider (temperature, max_tokens, ...).
    pub params: serde_json::Value,
    pub system_prompt: Option<String>,
}

impl ModelIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: serde_json::Value::Object(serde_json::Map::new()),
            system_prompt: None,
        }
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: String,
    /// Forwarded to the provider; the pipeline itself never enforces it.
    pub timeout: Option<Duration>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The external "generate text" capability, for both the model under test and judge models.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn identity(&self) -> ModelIdentity;

    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
