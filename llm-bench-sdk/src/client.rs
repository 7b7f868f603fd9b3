//! HTTP client for OpenAI-compatible chat-completion endpoints
//!
//! One request per call, no retries. Failures surface as [`SdkError`] and
//! convert into model errors at the [`TextGenerator`] boundary.

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use async_trait::async_trait;
use llm_bench_core::{GenerationRequest, ModelIdentity, TextGenerator};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// A [`TextGenerator`] backed by `POST {base_url}/chat/completions`
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: Arc<ClientConfig>,
}

impl ChatCompletionClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(SdkError::NetworkError)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Request body: configured params at top level, then model and messages.
    pub fn request_body(&self, request: &GenerationRequest) -> Value {
        let mut body: Map<String, Value> = self.config.params.clone();
        body.insert("model".to_string(), Value::String(self.config.model.clone()));
        body.insert(
            "messages".to_string(),
            serde_json::json!([
                ChatMessage::system(request.system_instruction.clone()),
                ChatMessage::user(request.prompt.clone()),
            ]),
        );
        Value::Object(body)
    }

    /// Sends one chat completion and returns the trimmed reply text.
    pub async fn complete(&self, request: &GenerationRequest) -> SdkResult<String> {
        let url = self.url("chat/completions");
        let body = self.request_body(request);

        let mut builder = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }
        let timeout = request.timeout.unwrap_or(self.config.timeout);
        builder = builder.timeout(timeout);

        debug!("POST {} model={}", url, self.config.model);
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                SdkError::Timeout(timeout.as_secs())
            } else {
                SdkError::NetworkError(err)
            }
        })?;

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let text = response.text().await.map_err(SdkError::NetworkError)?;

        if !status.is_success() {
            let err = Self::error_for(status, &text, request_id);
            error!(
                "Chat completion failed: status={:?}, retryable={}, model={}",
                err.status_code(),
                err.is_retryable(),
                self.config.model
            );
            return Err(err);
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SdkError::MalformedResponse("response has no choices".to_string()))?
            .message
            .content
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                SdkError::MalformedResponse("empty or invalid content in model response".to_string())
            })?;

        debug!("Generation complete (len={})", content.len());
        Ok(content)
    }

    fn error_for(status: StatusCode, body: &str, request_id: Option<String>) -> SdkError {
        SdkError::from_response(status.as_u16(), body, request_id)
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    fn identity(&self) -> ModelIdentity {
        let identity = ModelIdentity::new(self.config.model.clone())
            .with_params(Value::Object(self.config.params.clone()));
        match &self.config.system_prompt {
            Some(prompt) => identity.with_system_prompt(prompt.clone()),
            None => identity,
        }
    }

    async fn generate(&self, request: GenerationRequest) -> llm_bench_core::Result<String> {
        Ok(self.complete(&request).await?)
    }
}
