use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dest_core::prompts::{user_intent_spec, TAGGER_SYSTEM_PROMPT};
use dest_core::{RawUserIntent, UserIntent};
use dest_llm::LanguageModel;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct Tagger {
    model: Arc<dyn LanguageModel>,
}

impl Tagger {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    #[instrument(skip(self))]
    pub async fn extract_information(&self, user_text: &str) -> Result<UserIntent> {
        let value = self
            .model
            .extract_structured(TAGGER_SYSTEM_PROMPT, user_text, &user_intent_spec())
            .await
            .context("intent tagging failed")?;

        let raw: RawUserIntent =
            serde_json::from_value(value).context("tagger returned a malformed intent")?;
        let intent = UserIntent::from(raw);

        if intent.name.is_empty() {
            bail!("tagger found no travel destination");
        }

        debug!(name = %intent.name, topic = ?intent.intent, "intent tagged");
        Ok(intent)
    }
}
