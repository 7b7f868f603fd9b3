//! SDK error types and handling

use llm_bench_core::BenchError;
use thiserror::Error;

/// Errors raised while talking to a chat-completion endpoint
#[derive(Error, Debug)]
pub enum SdkError {
    /// The endpoint answered with a non-success status
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        error_code: Option<String>,
        request_id: Option<String>,
    },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Server error
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The body parsed but did not carry a usable completion
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Error body returned by OpenAI-compatible endpoints
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl SdkError {
    /// Create an error from a non-success response
    pub fn from_response(status: u16, body: &str, request_id: Option<String>) -> Self {
        let (message, error_code) = match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(parsed) => {
                let code = parsed
                    .error
                    .code
                    .map(|code| match code {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .or(parsed.error.kind);
                (parsed.error.message, code)
            }
            Err(_) => (body.trim().to_string(), None),
        };

        match status {
            401 | 403 => SdkError::AuthenticationError(message),
            429 => SdkError::RateLimited(message),
            500..=599 => SdkError::ServerError { status, message },
            _ => SdkError::ApiError {
                status,
                message,
                error_code,
                request_id,
            },
        }
    }

    /// Whether a caller could reasonably try again. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SdkError::NetworkError(_)
                | SdkError::Timeout(_)
                | SdkError::RateLimited(_)
                | SdkError::ServerError { .. }
        )
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } | SdkError::ServerError { status, .. } => Some(*status),
            SdkError::RateLimited(_) => Some(429),
            SdkError::NetworkError(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<SdkError> for BenchError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::ConfigurationError(msg) => BenchError::Configuration(msg),
            SdkError::UrlError(e) => BenchError::Configuration(format!("Invalid URL: {}", e)),
            other => BenchError::Model(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_openai_body() {
        let body = r#"{"error": {"message": "model not found", "type": "invalid_request_error", "code": "model_not_found"}}"#;
        let error = SdkError::from_response(404, body, Some("req-123".to_string()));

        match error {
            SdkError::ApiError {
                status,
                message,
                error_code,
                request_id,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "model not found");
                assert_eq!(error_code.as_deref(), Some("model_not_found"));
                assert_eq!(request_id.as_deref(), Some("req-123"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_from_plain_body() {
        let error = SdkError::from_response(502, "bad gateway\n", None);
        assert!(matches!(error, SdkError::ServerError { status: 502, ref message } if message == "bad gateway"));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_auth_and_rate_limit_statuses() {
        assert!(matches!(
            SdkError::from_response(401, "{}", None),
            SdkError::AuthenticationError(_)
        ));
        let limited = SdkError::from_response(429, "slow down", None);
        assert_eq!(limited.status_code(), Some(429));
        assert!(limited.is_retryable());
    }

    #[test]
    fn test_conversion_into_bench_error() {
        let model: BenchError = SdkError::MalformedResponse("no choices".to_string()).into();
        assert!(matches!(model, BenchError::Model(ref msg) if msg.contains("no choices")));

        let config: BenchError = SdkError::ConfigurationError("empty model".to_string()).into();
        assert!(matches!(config, BenchError::Configuration(_)));
    }
}
