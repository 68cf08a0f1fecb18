use std::fmt;
use std::str::FromStr;

use dest_core::{ToolCall, ToolSpec};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{FlightQuery, TravelClient, TravelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Airports,
    Hotels,
    Restaurants,
    Flights,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::Airports,
        ToolName::Hotels,
        ToolName::Restaurants,
        ToolName::Flights,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Airports => "get_airports",
            Self::Hotels => "get_hotels",
            Self::Restaurants => "get_restaurants",
            Self::Flights => "get_flights",
        }
    }

    pub fn spec(self) -> ToolSpec {
        let (description, parameters) = match self {
            Self::Airports => ("Get the airports near the input location name", location_schema()),
            Self::Hotels => (
                "Get the hotels near the input location name that have check in times today and checkout times in two days",
                location_schema(),
            ),
            Self::Restaurants => (
                "Get the restaurants near the input location name",
                location_schema(),
            ),
            Self::Flights => (
                "Search flights between two airports, identified by their airport codes, departing on the given date",
                flights_schema(),
            ),
        };

        ToolSpec {
            name: self.as_str().to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = TravelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == value)
            .ok_or_else(|| TravelError::UnknownTool(value.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct LocationInput {
    name: String,
}

fn location_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "name of the location" }
        },
        "required": ["name"]
    })
}

fn flights_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "sourceAirport": { "type": "string", "description": "airport code of the departure airport, for example JFK" },
            "destAirport": { "type": "string", "description": "airport code of the arrival airport, for example CDG" },
            "year": { "type": "integer", "description": "year of departure" },
            "month": { "type": "integer", "description": "month of departure, 1-12" },
            "day": { "type": "integer", "description": "day of month of departure" },
            "round_trip": { "type": "boolean", "description": "whether a return flight is wanted" },
            "return_year": { "type": "integer", "description": "year of the return flight" },
            "return_month": { "type": "integer", "description": "month of the return flight" },
            "return_day": { "type": "integer", "description": "day of month of the return flight" },
            "num_adults": { "type": "integer", "description": "number of adult passengers" },
            "num_seniors": { "type": "integer", "description": "number of senior passengers" },
            "service_class": {
                "type": "string",
                "enum": ["economy", "premium_economy", "business", "first"],
                "description": "cabin class"
            }
        },
        "required": ["sourceAirport", "destAirport", "year", "month", "day"]
    })
}

fn arguments<T: DeserializeOwned>(tool: ToolName, call: &ToolCall) -> Result<T, TravelError> {
    serde_json::from_value(call.arguments.clone()).map_err(|source| {
        TravelError::InvalidArguments {
            tool: tool.as_str(),
            source,
        }
    })
}

impl TravelClient {
    pub fn tool_specs() -> Vec<ToolSpec> {
        ToolName::ALL.into_iter().map(ToolName::spec).collect()
    }

    pub async fn invoke(&self, call: &ToolCall) -> Result<String, TravelError> {
        let tool = call.name.parse::<ToolName>()?;
        info!(tool = %tool, "invoking travel tool");

        match tool {
            ToolName::Airports => {
                let input: LocationInput = arguments(tool, call)?;
                self.get_airports(&input.name).await
            }
            ToolName::Hotels => {
                let input: LocationInput = arguments(tool, call)?;
                self.get_hotels(&input.name).await
            }
            ToolName::Restaurants => {
                let input: LocationInput = arguments(tool, call)?;
                self.get_restaurants(&input.name).await
            }
            ToolName::Flights => {
                let query: FlightQuery = arguments(tool, call)?;
                self.get_flights(&query).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::test_client;

    #[test]
    fn tool_names_round_trip_through_from_str() {
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>().unwrap(), tool);
        }
    }

    #[test]
    fn unknown_tool_name_is_rejected() {
        let error = "get_weather".parse::<ToolName>().unwrap_err();
        assert!(matches!(error, TravelError::UnknownTool(name) if name == "get_weather"));
    }

    #[test]
    fn specs_cover_every_tool() {
        let names = TravelClient::tool_specs()
            .into_iter()
            .map(|spec| spec.name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["get_airports", "get_hotels", "get_restaurants", "get_flights"]
        );
    }

    #[tokio::test]
    async fn invoke_dispatches_to_the_named_adapter() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/flights/searchAirport")
            .match_query(Matcher::UrlEncoded("query".into(), "Rome".into()))
            .with_status(200)
            .with_body(
                json!({ "data": [{ "shortName": "Fiumicino", "name": "Leonardo da Vinci", "airportCode": "FCO" }] })
                    .to_string(),
            )
            .create_async()
            .await;

        let output = test_client(&server)
            .invoke(&ToolCall {
                name: "get_airports".to_string(),
                arguments: json!({ "name": "Rome" }),
            })
            .await
            .unwrap();
        assert!(output.contains("Airport Code: FCO"));
    }

    #[tokio::test]
    async fn invoke_rejects_unknown_tools_and_bad_arguments() {
        let server = mockito::Server::new_async().await;
        let client = test_client(&server);

        let unknown = client
            .invoke(&ToolCall {
                name: "get_weather".to_string(),
                arguments: json!({ "name": "Rome" }),
            })
            .await
            .unwrap_err();
        assert!(matches!(unknown, TravelError::UnknownTool(_)));

        let invalid = client
            .invoke(&ToolCall {
                name: "get_restaurants".to_string(),
                arguments: json!({ "city": "Rome" }),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            invalid,
            TravelError::InvalidArguments { tool: "get_restaurants", .. }
        ));
    }
}
