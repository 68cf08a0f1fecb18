use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use dest_core::ConversationMessage;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<ConversationMessage>,
}

pub trait SessionRepository: Send + Sync {
    async fn append_message(&self, session_id: &str, message: ConversationMessage) -> Result<()>;
    async fn load_session(&self, session_id: &str) -> Result<Option<ConversationSession>>;
    async fn session_count(&self) -> Result<usize>;
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<String, ConversationSession>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for MemoryStore {
    async fn append_message(&self, session_id: &str, message: ConversationMessage) -> Result<()> {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationSession {
                session_id: session_id.to_string(),
                started_at: now,
                updated_at: now,
                messages: Vec::new(),
            });

        session.updated_at = now;
        session.messages.push(message);
        Ok(())
    }

    async fn load_session(&self, session_id: &str) -> Result<Option<ConversationSession>> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    async fn session_count(&self) -> Result<usize> {
        Ok(self.sessions.read().len())
    }
}
