mod openai;

#[cfg(any(test, feature = "test-support"))]
pub mod scripted;

use async_trait::async_trait;
use dest_core::{ToolCall, ToolSpec};
use serde_json::Value;
use thiserror::Error;

pub use openai::{OpenAiChatModel, OpenAiConfig, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("language model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("language model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("language model returned neither text nor a function call")]
    EmptyResponse,
    #[error("arguments for function {function} are not valid json: {source}")]
    MalformedArguments {
        function: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("language model did not return structured output for {0}")]
    MissingStructuredOutput(String),
    #[error("language model called function {0} where text was expected")]
    UnexpectedToolCall(String),
    #[error("language model unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    Final(String),
    ToolCall(ToolCall),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;

    async fn extract_structured(
        &self,
        system: &str,
        user: &str,
        schema: &ToolSpec,
    ) -> Result<Value, LlmError>;

    async fn call_with_tools(
        &self,
        system: &str,
        user: &str,
        tools: &[ToolSpec],
    ) -> Result<ModelResponse, LlmError>;
}
