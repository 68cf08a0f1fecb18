use std::time::Duration;

use async_trait::async_trait;
use dest_core::{ToolCall, ToolSpec};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{LanguageModel, LlmError, ModelResponse};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-0125";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    config: OpenAiConfig,
    http_client: Client,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            config,
        })
    }

    async fn send(
        &self,
        system: &str,
        user: &str,
        tools: &[ToolSpec],
        tool_choice: Option<Value>,
    ) -> Result<ModelResponse, LlmError> {
        let mut payload = json!({
            "model": self.config.model,
            "temperature": 0.0,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ]
        });

        if !tools.is_empty() {
            payload["tools"] = Value::Array(tools.iter().map(tool_definition).collect());
            payload["tool_choice"] = tool_choice.unwrap_or_else(|| json!("auto"));
        }

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.config.api_key.as_str())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        parse_chat_completion(completion)
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        match self.send(system, user, &[], None).await? {
            ModelResponse::Final(text) => Ok(text),
            ModelResponse::ToolCall(call) => Err(LlmError::UnexpectedToolCall(call.name)),
        }
    }

    async fn extract_structured(
        &self,
        system: &str,
        user: &str,
        schema: &ToolSpec,
    ) -> Result<Value, LlmError> {
        let forced = json!({ "type": "function", "function": { "name": schema.name } });
        match self
            .send(system, user, std::slice::from_ref(schema), Some(forced))
            .await?
        {
            ModelResponse::ToolCall(call) if call.name == schema.name => Ok(call.arguments),
            _ => Err(LlmError::MissingStructuredOutput(schema.name.clone())),
        }
    }

    async fn call_with_tools(
        &self,
        system: &str,
        user: &str,
        tools: &[ToolSpec],
    ) -> Result<ModelResponse, LlmError> {
        self.send(system, user, tools, None).await
    }
}

fn tool_definition(spec: &ToolSpec) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": spec.name,
            "description": spec.description,
            "parameters": spec.parameters
        }
    })
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default)]
    function_call: Option<WireFunction>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn parse_chat_completion(completion: ChatCompletion) -> Result<ModelResponse, LlmError> {
    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(LlmError::EmptyResponse)?;

    let mut calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| call.function)
        .chain(message.function_call);

    if let Some(function) = calls.next() {
        let ignored = calls.count();
        if ignored > 0 {
            debug!(function = %function.name, ignored, "resolving only the first function call");
        }

        let arguments = if function.arguments.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&function.arguments).map_err(|source| {
                LlmError::MalformedArguments {
                    function: function.name.clone(),
                    source,
                }
            })?
        };

        return Ok(ModelResponse::ToolCall(ToolCall {
            name: function.name,
            arguments,
        }));
    }

    message
        .content
        .filter(|text| !text.trim().is_empty())
        .map(ModelResponse::Final)
        .ok_or(LlmError::EmptyResponse)
}
