use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use dest_api::{build_router, ApiState};
use dest_core::{ToolCall, FALLBACK_MESSAGE};
use dest_llm::scripted::{ScriptedModel, ScriptedReply};
use dest_tests::{mock_paris_restaurants, scripted_agent};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(model: &ScriptedModel, server: &mockito::Server) -> Router {
    build_router(ApiState::new(scripted_agent(model, server)))
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let server = mockito::Server::new_async().await;
    let app = app(&ScriptedModel::default(), &server);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn chat_rejects_blank_text() {
    let server = mockito::Server::new_async().await;
    let model = ScriptedModel::default();
    let app = app(&model, &server);

    let response = app
        .oneshot(chat_request(json!({ "text": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(model.requests().is_empty());
}

#[tokio::test]
async fn chat_returns_turn_and_records_history() {
    let mut server = mockito::Server::new_async().await;
    mock_paris_restaurants(&mut server).await;

    let model = ScriptedModel::new([
        ScriptedReply::Structured(json!({ "name": "Paris", "intent": "restaurants" })),
        ScriptedReply::ToolCall(ToolCall {
            name: "get_restaurants".to_string(),
            arguments: json!({ "name": "Paris" }),
        }),
        ScriptedReply::Text("Try Le Comptoir du Relais or Septime.".to_string()),
    ]);
    let app = app(&model, &server);

    let response = app
        .clone()
        .oneshot(chat_request(json!({
            "session_id": "web-1",
            "text": "Where should I eat in Paris?"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["session_id"], "web-1");
    assert_eq!(body["stage"], "done");
    assert_eq!(body["reply"], "Try Le Comptoir du Relais or Septime.");
    assert_eq!(body["displayed"].as_array().unwrap().len(), 4);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/sessions/web-1/messages")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let history = json_body(response).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["content"], "Where should I eat in Paris?");
    assert_eq!(history[1]["content"], "Try Le Comptoir du Relais or Septime.");
}

#[tokio::test]
async fn failed_turn_is_still_ok_with_fallback() {
    let server = mockito::Server::new_async().await;
    let model = ScriptedModel::new([ScriptedReply::Fail("rate limited".to_string())]);
    let app = app(&model, &server);

    let response = app
        .oneshot(chat_request(json!({ "text": "hotels in Lisbon" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["stage"], "error");
    assert_eq!(body["reply"], FALLBACK_MESSAGE);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let server = mockito::Server::new_async().await;
    let app = app(&ScriptedModel::default(), &server);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/sessions/missing/messages")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "unknown session");
}

#[tokio::test]
async fn metrics_count_turns_and_fallbacks() {
    let server = mockito::Server::new_async().await;
    let model = ScriptedModel::new([
        ScriptedReply::Fail("offline".to_string()),
        ScriptedReply::Structured(json!({ "name": "Kyoto" })),
        ScriptedReply::Text("Kyoto was Japan's imperial capital.".to_string()),
        ScriptedReply::Text("Kyoto is known for its temples.".to_string()),
    ]);
    let app = app(&model, &server);

    for text in ["airports near Kyoto", "tell me about Kyoto"] {
        let response = app
            .clone()
            .oneshot(chat_request(json!({ "text": text })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(Request::builder().uri("/v1/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let metrics = json_body(response).await;
    assert_eq!(metrics["turns_total"], 2);
    assert_eq!(metrics["fallback_total"], 1);
    assert_eq!(metrics["direct_answers_total"], 1);
    assert_eq!(metrics["tool_calls_total"], 0);
}
