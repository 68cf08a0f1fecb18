use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{push_separator, DataList, Fetched, TravelClient, TravelError, NO_AIRPORTS};

const SEARCH_AIRPORT: &str = "/api/v1/flights/searchAirport";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Airport {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    airport_code: Option<String>,
}

impl TravelClient {
    #[instrument(skip(self))]
    pub async fn get_airports(&self, name: &str) -> Result<String, TravelError> {
        let airports = match self
            .fetch::<DataList<Airport>>(SEARCH_AIRPORT, &[("query", name.to_string())])
            .await?
        {
            Fetched::Data(list) => list.into_items(),
            Fetched::Rejected(body) => {
                return Ok(format!(
                    "Not able to retrieve the airports by: {name}. Response text: {body}"
                ))
            }
        };

        if airports.is_empty() {
            return Ok(NO_AIRPORTS.to_string());
        }

        let mut output = String::new();
        for airport in &airports {
            output.push_str(&format!(
                "Short Name: {}\nFull Name: {}\nAirport Code: {}\n",
                airport.short_name.as_deref().unwrap_or(""),
                airport.name.as_deref().unwrap_or(""),
                airport.airport_code.as_deref().unwrap_or("")
            ));
            push_separator(&mut output);
        }

        debug!(records = airports.len(), "airports retrieved");
        Ok(output)
    }
}
