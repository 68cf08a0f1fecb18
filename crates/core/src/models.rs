use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Airports,
    Hotels,
    Restaurants,
}

impl Topic {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "airports" | "airport" => Some(Self::Airports),
            "hotels" | "hotel" => Some(Self::Hotels),
            "restaurants" | "restaurant" | "restraunts" | "restraunt" => Some(Self::Restaurants),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Airports => "airports",
            Self::Hotels => "hotels",
            Self::Restaurants => "restaurants",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIntent {
    pub name: String,
    pub intent: Option<Topic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserIntent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
}

impl From<RawUserIntent> for UserIntent {
    fn from(raw: RawUserIntent) -> Self {
        Self {
            name: raw
                .name
                .map(|name| name.trim().to_string())
                .unwrap_or_default(),
            intent: raw.intent.as_deref().and_then(Topic::parse),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStage {
    Idle,
    Tagging,
    Extracting,
    Summarizing,
    Done,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub session_id: String,
    pub stage: TurnStage,
    pub intent: Option<UserIntent>,
    pub reply: String,
    pub displayed: Vec<ConversationMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatInput {
    pub session_id: Option<String>,
    pub text: String,
}
