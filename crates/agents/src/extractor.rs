use std::sync::Arc;

use anyhow::{Context, Result};
use dest_core::prompts::EXTRACTOR_SYSTEM_PROMPT;
use dest_core::{build_information_query, ToolSpec, UserIntent};
use dest_llm::{LanguageModel, ModelResponse};
use dest_travel::{ToolName, TravelClient};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct Information {
    pub text: String,
    pub tool: Option<ToolName>,
}

#[derive(Clone)]
pub struct InformationExtractor {
    model: Arc<dyn LanguageModel>,
    travel: TravelClient,
    tools: Vec<ToolSpec>,
}

impl InformationExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, travel: TravelClient) -> Self {
        Self {
            model,
            travel,
            tools: TravelClient::tool_specs(),
        }
    }

    pub async fn get_information(&self, intent: &UserIntent) -> Result<String> {
        Ok(self.resolve(intent).await?.text)
    }

    #[instrument(skip(self), fields(name = %intent.name))]
    pub async fn resolve(&self, intent: &UserIntent) -> Result<Information> {
        let query = build_information_query(intent);
        let response = self
            .model
            .call_with_tools(EXTRACTOR_SYSTEM_PROMPT, &query, &self.tools)
            .await
            .context("information extraction failed")?;

        self.route(response).await
    }

    async fn route(&self, response: ModelResponse) -> Result<Information> {
        match response {
            ModelResponse::Final(text) => {
                debug!("model answered without a tool");
                Ok(Information { text, tool: None })
            }
            ModelResponse::ToolCall(call) => {
                let tool = call.name.parse::<ToolName>()?;
                let text = self
                    .travel
                    .invoke(&call)
                    .await
                    .with_context(|| format!("tool {tool} failed"))?;
                Ok(Information {
                    text,
                    tool: Some(tool),
                })
            }
        }
    }
}
