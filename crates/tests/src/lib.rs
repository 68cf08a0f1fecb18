use std::sync::Arc;

use dest_agents::DestinationAgent;
use dest_llm::scripted::ScriptedModel;
use dest_observability::AppMetrics;
use dest_storage::MemoryStore;
use dest_travel::{TravelClient, TravelConfig};
use mockito::{Matcher, Server};
use serde_json::json;

pub const PARIS_LOCATION_ID: &str = "187147";

pub fn travel_client(server: &Server) -> TravelClient {
    TravelClient::new(TravelConfig {
        api_key: "integration-key".to_string(),
        base_url: server.url(),
        ..TravelConfig::default()
    })
    .expect("travel client should build")
}

pub fn scripted_agent(model: &ScriptedModel, server: &Server) -> DestinationAgent<MemoryStore> {
    DestinationAgent::new(
        Arc::new(model.clone()),
        travel_client(server),
        Arc::new(MemoryStore::new()),
        AppMetrics::shared(),
    )
}

pub async fn mock_paris_location(server: &mut Server, status: usize, body: String) -> mockito::Mock {
    server
        .mock("GET", "/api/v1/restaurant/searchLocation")
        .match_query(Matcher::UrlEncoded("query".into(), "Paris".into()))
        .match_header("X-RapidAPI-Key", "integration-key")
        .with_status(status)
        .with_body(body)
        .create_async()
        .await
}

pub async fn mock_paris_restaurants(server: &mut Server) {
    mock_paris_location(
        server,
        200,
        json!({ "data": [{ "locationId": PARIS_LOCATION_ID, "localizedName": "Paris" }] }).to_string(),
    )
    .await;

    server
        .mock("GET", "/api/v1/restaurant/searchRestaurants")
        .match_query(Matcher::UrlEncoded(
            "locationId".into(),
            PARIS_LOCATION_ID.into(),
        ))
        .with_status(200)
        .with_body(
            json!({ "data": { "data": [
                {
                    "name": "Le Comptoir du Relais",
                    "establishmentTypeAndCuisineTags": ["French"],
                    "averageRating": 4.5,
                    "hasMenu": false,
                    "currentOpenStatusText": "Open now"
                },
                {
                    "name": "Septime",
                    "establishmentTypeAndCuisineTags": ["French", "Contemporary"],
                    "averageRating": 5,
                    "hasMenu": true,
                    "menuUrl": "https://example.com/septime",
                    "currentOpenStatusText": "Closed now"
                }
            ] } })
            .to_string(),
        )
        .create_async()
        .await;
}
