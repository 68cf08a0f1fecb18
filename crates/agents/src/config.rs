use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dest_llm::{OpenAiConfig, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use dest_travel::{TravelConfig, DEFAULT_TRAVEL_BASE_URL, DEFAULT_TRAVEL_HOST};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai: OpenAiConfig,
    pub travel: TravelConfig,
    pub bind: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timeout = match lookup("DEST_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse::<u64>().with_context(|| {
                format!("DEST_HTTP_TIMEOUT_SECS must be a whole number of seconds, got {raw}")
            })?)),
            None => None,
        };

        Ok(Self {
            openai: OpenAiConfig {
                api_key: read("OPENAI_API_KEY", ""),
                model: read("DEST_OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                base_url: read("DEST_OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                timeout,
            },
            travel: TravelConfig {
                api_key: read("RAPID_TRIP_ADVISOR_API_TOKEN", ""),
                host: read("DEST_TRAVEL_HOST", DEFAULT_TRAVEL_HOST),
                base_url: read("DEST_TRAVEL_BASE_URL", DEFAULT_TRAVEL_BASE_URL),
                timeout,
            },
            bind: read("DEST_BIND", DEFAULT_BIND),
        })
    }
}
