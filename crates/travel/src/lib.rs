mod airports;
mod flights;
mod hotels;
mod restaurants;
mod tools;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub use flights::{FlightQuery, ServiceClass};
pub use tools::ToolName;

pub const DEFAULT_TRAVEL_BASE_URL: &str = "https://tripadvisor16.p.rapidapi.com";
pub const DEFAULT_TRAVEL_HOST: &str = "tripadvisor16.p.rapidapi.com";

pub const RECORD_SEPARATOR: &str = "------------------------------------------------------";
pub const LOCATION_NOT_FOUND: &str = "Not found. Please try another question";
pub const NO_RESTAURANTS: &str = "Not able to retrieve any restaurants. Please try another question";
pub const NO_HOTELS: &str = "Not able to retrieve any hotels. Please try another question";
pub const NO_AIRPORTS: &str = "Not able to retrieve any airports. Please try another question";
pub const NO_FLIGHTS: &str = "Not able to retrieve any flights. Please try another question";
pub const ROUND_TRIP_NEEDS_RETURN: &str =
    "Not able to search round trip flights without a return date. Please try another question";

#[derive(Debug, Error)]
pub enum TravelError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid date {year}-{month}-{day} for {tool}")]
    InvalidDate {
        tool: &'static str,
        year: i32,
        month: u32,
        day: u32,
    },
    #[error("travel api request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("travel api returned an unreadable body from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct TravelConfig {
    pub api_key: String,
    pub host: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: DEFAULT_TRAVEL_HOST.to_string(),
            base_url: DEFAULT_TRAVEL_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TravelClient {
    config: TravelConfig,
    http_client: Client,
}

// Non-success responses keep their body for the sentinel text.
enum Fetched<T> {
    Data(T),
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct DataList<T> {
    data: Option<Vec<T>>,
}

impl<T> DataList<T> {
    fn into_items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct NestedList<T> {
    data: Option<DataList<T>>,
}

impl<T> NestedList<T> {
    fn into_items(self) -> Vec<T> {
        self.data.map(DataList::into_items).unwrap_or_default()
    }
}

impl TravelClient {
    pub fn new(config: TravelConfig) -> Result<Self, TravelError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            config,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Fetched<T>, TravelError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self
            .http_client
            .get(url)
            .header("accept", "application/json")
            .header("X-RapidAPI-Host", self.config.host.as_str())
            .header("X-RapidAPI-Key", self.config.api_key.as_str())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let headers = format!("{:?}", response.headers());
        let body = response.text().await?;

        if !status.is_success() {
            debug!(
                endpoint = path,
                status = status.as_u16(),
                headers = %headers,
                body = %body,
                "travel api rejected request"
            );
            return Ok(Fetched::Rejected(body));
        }

        debug!(endpoint = path, "travel api request succeeded");
        serde_json::from_str(&body)
            .map(Fetched::Data)
            .map_err(|source| TravelError::Decode {
                endpoint: path.to_string(),
                source,
            })
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn push_separator(output: &mut String) {
    output.push_str(RECORD_SEPARATOR);
    output.push('\n');
}

#[cfg(test)]
fn test_client(server: &mockito::Server) -> TravelClient {
    TravelClient::new(TravelConfig {
        api_key: "test-key".to_string(),
        base_url: server.url(),
        ..TravelConfig::default()
    })
    .unwrap()
}
