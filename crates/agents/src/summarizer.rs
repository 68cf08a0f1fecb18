use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dest_core::prompts::{summarizer_user_prompt, SUMMARIZER_SYSTEM_PROMPT};
use dest_llm::LanguageModel;
use tracing::instrument;

#[derive(Clone)]
pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    #[instrument(skip(self, information), fields(information_len = information.len()))]
    pub async fn summarize(&self, information: &str, original_question: &str) -> Result<String> {
        let answer = self
            .model
            .complete(
                SUMMARIZER_SYSTEM_PROMPT,
                &summarizer_user_prompt(information, original_question),
            )
            .await
            .context("summarization failed")?;

        let answer = answer.trim();
        if answer.is_empty() {
            bail!("summarizer returned an empty answer");
        }
        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use dest_llm::scripted::{ScriptedModel, ScriptedReply};

    use super::*;

    #[tokio::test]
    async fn sends_question_and_information() {
        let model = ScriptedModel::new([ScriptedReply::Text(
            "  Try Le Comptoir for classic bistro food. ".to_string(),
        )]);
        let summarizer = Summarizer::new(Arc::new(model.clone()));

        let answer = summarizer
            .summarize(
                "Restaurant Name: Le Comptoir\n",
                "What restaurants are good in Paris?",
            )
            .await
            .unwrap();

        assert_eq!(answer, "Try Le Comptoir for classic bistro food.");
        let request = &model.requests()[0];
        assert_eq!(request.system, SUMMARIZER_SYSTEM_PROMPT);
        assert!(request.user.contains("What restaurants are good in Paris?"));
        assert!(request.user.contains("Restaurant Name: Le Comptoir"));
        assert!(request.tools.is_empty());
    }

    #[tokio::test]
    async fn blank_answer_is_an_error() {
        let model = ScriptedModel::new([ScriptedReply::Text("   ".to_string())]);
        let summarizer = Summarizer::new(Arc::new(model));
        assert!(summarizer.summarize("info", "question").await.is_err());
    }
}
