//! Client configuration

use crate::error::{SdkError, SdkResult};
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for a chat-completion client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the OpenAI-compatible API, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Sent as a bearer token when present
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    pub model: String,

    /// Extra top-level request fields (temperature, max_tokens, ...)
    pub params: Map<String, Value>,

    /// System prompt recorded in the model identity
    pub system_prompt: Option<String>,

    /// Request timeout, unless a request carries its own
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            params: Map::new(),
            system_prompt: None,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("llm-bench/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }
        url::Url::parse(&self.base_url)?;

        if self.model.trim().is_empty() {
            return Err(SdkError::ConfigurationError(
                "Model name cannot be empty".to_string(),
            ));
        }

        if self.api_key.as_deref().is_some_and(|key| key.trim().is_empty()) {
            return Err(SdkError::ConfigurationError(
                "API key cannot be blank".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(SdkError::ConfigurationError(
                "Timeout cannot be zero".to_string(),
            ));
        }

        for reserved in ["model", "messages"] {
            if self.params.contains_key(reserved) {
                return Err(SdkError::ConfigurationError(format!(
                    "'{}' cannot be set through model params",
                    reserved
                )));
            }
        }

        Ok(())
    }
}
