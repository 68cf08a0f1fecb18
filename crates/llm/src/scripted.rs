use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use dest_core::{ToolCall, ToolSpec};
use parking_lot::Mutex;
use serde_json::Value;

use crate::{LanguageModel, LlmError, ModelResponse};

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Structured(Value),
    ToolCall(ToolCall),
    Fail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub system: String,
    pub user: String,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedModel {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedModel {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }

    fn next(&self, system: &str, user: &str, tools: &[ToolSpec]) -> Result<ScriptedReply, LlmError> {
        self.requests.lock().push(RecordedRequest {
            system: system.to_string(),
            user: user.to_string(),
            tools: tools.iter().map(|tool| tool.name.clone()).collect(),
        });

        match self.replies.lock().pop_front() {
            Some(ScriptedReply::Fail(reason)) => Err(LlmError::Unavailable(reason)),
            Some(reply) => Ok(reply),
            None => Err(LlmError::Unavailable("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        match self.next(system, user, &[])? {
            ScriptedReply::Text(text) => Ok(text),
            ScriptedReply::ToolCall(call) => Err(LlmError::UnexpectedToolCall(call.name)),
            _ => Err(LlmError::EmptyResponse),
        }
    }

    async fn extract_structured(
        &self,
        system: &str,
        user: &str,
        schema: &ToolSpec,
    ) -> Result<Value, LlmError> {
        match self.next(system, user, std::slice::from_ref(schema))? {
            ScriptedReply::Structured(value) => Ok(value),
            _ => Err(LlmError::MissingStructuredOutput(schema.name.clone())),
        }
    }

    async fn call_with_tools(
        &self,
        system: &str,
        user: &str,
        tools: &[ToolSpec],
    ) -> Result<ModelResponse, LlmError> {
        match self.next(system, user, tools)? {
            ScriptedReply::Text(text) => Ok(ModelResponse::Final(text)),
            ScriptedReply::ToolCall(call) => Ok(ModelResponse::ToolCall(call)),
            _ => Err(LlmError::EmptyResponse),
        }
    }
}
