mod config;
mod extractor;
mod summarizer;
mod tagger;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use dest_core::{
    acknowledgement, normalize_text, ConversationMessage, TurnOutcome, TurnStage, UserIntent,
    CHECKING_MESSAGE, FALLBACK_MESSAGE,
};
use dest_llm::{LanguageModel, OpenAiChatModel};
use dest_observability::{AppMetrics, MetricsSnapshot};
use dest_storage::{MemoryStore, SessionRepository};
use dest_travel::TravelClient;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub use config::{AppConfig, DEFAULT_BIND};
pub use extractor::{Information, InformationExtractor};
pub use summarizer::Summarizer;
pub use tagger::Tagger;

struct PipelineRun {
    intent: UserIntent,
    acknowledgement: String,
    answer: String,
}

#[derive(Clone)]
pub struct DestinationAgent<S>
where
    S: SessionRepository,
{
    tagger: Tagger,
    extractor: InformationExtractor,
    summarizer: Summarizer,
    store: Arc<S>,
    metrics: Arc<AppMetrics>,
}

impl DestinationAgent<MemoryStore> {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let model = OpenAiChatModel::new(config.openai.clone())
            .context("failed building the language model client")?;
        let travel = TravelClient::new(config.travel.clone())
            .context("failed building the travel api client")?;
        info!(model = model.model_name(), "language model configured");

        Ok(Self::new(
            Arc::new(model),
            travel,
            Arc::new(MemoryStore::new()),
            AppMetrics::shared(),
        ))
    }
}

impl<S> DestinationAgent<S>
where
    S: SessionRepository,
{
    pub fn new(
        model: Arc<dyn LanguageModel>,
        travel: TravelClient,
        store: Arc<S>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            tagger: Tagger::new(model.clone()),
            extractor: InformationExtractor::new(model.clone(), travel),
            summarizer: Summarizer::new(model),
            store,
            metrics,
        }
    }

    pub fn tagger(&self) -> &Tagger {
        &self.tagger
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn handle_turn(&self, session_id: Option<String>, text: &str) -> Result<TurnOutcome> {
        self.handle_turn_with(session_id, text, |_| {}).await
    }

    // Messages reach `report` as they are produced. Only a failing session
    // store is returned as an error.
    #[instrument(skip(self, text, report))]
    pub async fn handle_turn_with<F>(
        &self,
        session_id: Option<String>,
        text: &str,
        mut report: F,
    ) -> Result<TurnOutcome>
    where
        F: FnMut(&ConversationMessage) + Send,
    {
        let started = Instant::now();
        self.metrics.inc_turn();

        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let user_message = ConversationMessage::user(text.trim());

        self.store
            .append_message(&session_id, user_message.clone())
            .await?;
        report(&user_message);

        let mut stage = TurnStage::Idle;
        let result = self
            .run_pipeline(&normalize_text(text), &mut stage, &mut report)
            .await;
        let outcome = match result {
            Ok(run) => {
                let answer = ConversationMessage::assistant(run.answer.as_str());
                self.store
                    .append_message(&session_id, answer.clone())
                    .await?;
                report(&answer);

                TurnOutcome {
                    session_id: session_id.clone(),
                    stage: TurnStage::Done,
                    displayed: vec![
                        user_message,
                        ConversationMessage::assistant(CHECKING_MESSAGE),
                        ConversationMessage::assistant(run.acknowledgement),
                        answer,
                    ],
                    intent: Some(run.intent),
                    reply: run.answer,
                }
            }
            Err(error) => {
                warn!(
                    session_id = %session_id,
                    stage = ?stage,
                    error = %format!("{error:#}"),
                    "turn failed, replying with fallback"
                );
                self.metrics.inc_fallback();
                let fallback = ConversationMessage::assistant(FALLBACK_MESSAGE);
                self.store
                    .append_message(&session_id, fallback.clone())
                    .await?;
                report(&fallback);

                TurnOutcome {
                    session_id: session_id.clone(),
                    stage: TurnStage::Error,
                    intent: None,
                    reply: FALLBACK_MESSAGE.to_string(),
                    displayed: vec![user_message, fallback],
                }
            }
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            session_id = %session_id,
            stage = ?outcome.stage,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "turn handled"
        );

        Ok(outcome)
    }

    async fn run_pipeline<F>(
        &self,
        text: &str,
        stage: &mut TurnStage,
        report: &mut F,
    ) -> Result<PipelineRun>
    where
        F: FnMut(&ConversationMessage) + Send,
    {
        report(&ConversationMessage::assistant(CHECKING_MESSAGE));

        *stage = TurnStage::Tagging;
        let intent = self.tagger.extract_information(text).await?;
        let acknowledgement = acknowledgement(&intent);
        report(&ConversationMessage::assistant(acknowledgement.as_str()));

        *stage = TurnStage::Extracting;
        let information = self.extractor.resolve(&intent).await?;
        match information.tool {
            Some(_) => self.metrics.inc_tool_call(),
            None => self.metrics.inc_direct_answer(),
        }

        *stage = TurnStage::Summarizing;
        let answer = self.summarizer.summarize(&information.text, text).await?;

        Ok(PipelineRun {
            intent,
            acknowledgement,
            answer,
        })
    }

    pub async fn history(&self, session_id: &str) -> Result<Option<Vec<ConversationMessage>>> {
        Ok(self
            .store
            .load_session(session_id)
            .await?
            .map(|session| session.messages))
    }

    pub async fn session_count(&self) -> Result<usize> {
        self.store.session_count().await
    }
}
