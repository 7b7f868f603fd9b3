//! Chat-completion client for llm-bench
//!
//! Provides [`ChatCompletionClient`], a [`llm_bench_core::TextGenerator`] that
//! talks to any OpenAI-compatible `/chat/completions` endpoint. It is used for
//! both the model under test and judge models.
//!
//! ```rust,no_run
//! use llm_bench_sdk::{ChatCompletionClient, ClientConfig};
//!
//! let config = ClientConfig::new("https://api.openai.com/v1", "gpt-4o-mini")
//!     .with_api_key("sk-...")
//!     .with_param("temperature", 0.0);
//! let client = ChatCompletionClient::new(config)?;
//! # Ok::<(), llm_bench_sdk::SdkError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{ChatChoice, ChatCompletionClient, ChatCompletionResponse, ChatMessage};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{SdkError, SdkResult};
