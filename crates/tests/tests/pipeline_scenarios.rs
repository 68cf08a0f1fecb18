use dest_core::{Role, ToolCall, Topic, TurnStage, UserIntent, FALLBACK_MESSAGE};
use dest_llm::scripted::{ScriptedModel, ScriptedReply};
use dest_tests::{mock_paris_location, mock_paris_restaurants, scripted_agent};
use dest_travel::RECORD_SEPARATOR;
use serde_json::json;

fn restaurants_in_paris_script(summary: &str) -> ScriptedModel {
    ScriptedModel::new([
        ScriptedReply::Structured(json!({ "name": "Paris", "intent": "restraunts" })),
        ScriptedReply::ToolCall(ToolCall {
            name: "get_restaurants".to_string(),
            arguments: json!({ "name": "Paris" }),
        }),
        ScriptedReply::Text(summary.to_string()),
    ])
}

#[tokio::test]
async fn restaurants_question_is_answered_from_listings() {
    let mut server = mockito::Server::new_async().await;
    mock_paris_restaurants(&mut server).await;

    let model = restaurants_in_paris_script(
        "In Paris you could try Le Comptoir du Relais (4.5) or Septime (5).",
    );
    let agent = scripted_agent(&model, &server);

    let outcome = agent
        .handle_turn(None, "What are good restaurants in Paris?")
        .await
        .unwrap();

    assert_eq!(outcome.stage, TurnStage::Done);
    assert_eq!(
        outcome.intent,
        Some(UserIntent {
            name: "Paris".to_string(),
            intent: Some(Topic::Restaurants),
        })
    );
    assert!(outcome.reply.contains("Le Comptoir du Relais"));
    assert!(outcome.reply.contains("Septime"));

    let requests = model.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].tools, vec!["UserIntent".to_string()]);
    assert_eq!(
        requests[1].user,
        "I want to know about the travel destination with name Paris and want to talk about the restaurants."
    );
    assert_eq!(requests[1].tools.len(), 4);

    let summary_request = &requests[2];
    assert!(summary_request.user.contains("What are good restaurants in Paris?"));
    assert!(summary_request.user.contains("Restaurant Name: Le Comptoir du Relais"));
    assert!(summary_request.user.contains("Menu URL: https://example.com/septime"));
    assert_eq!(summary_request.user.matches(RECORD_SEPARATOR).count(), 2);
    assert!(summary_request.tools.is_empty());
}

#[tokio::test]
async fn failing_location_search_reaches_the_summarizer_as_text() {
    let mut server = mockito::Server::new_async().await;
    mock_paris_location(&mut server, 500, "upstream exploded".to_string()).await;

    let model = restaurants_in_paris_script(
        "Sorry, I could not find restaurant information for Paris right now.",
    );
    let agent = scripted_agent(&model, &server);

    let outcome = agent
        .handle_turn(None, "What are good restaurants in Paris?")
        .await
        .unwrap();

    assert_eq!(outcome.stage, TurnStage::Done);
    assert!(!outcome.reply.contains("Septime"));

    let summary_request = &model.requests()[2];
    assert!(summary_request.user.contains(
        "Not able to retrieve the location with name: Paris. Response text: upstream exploded"
    ));
}

#[tokio::test]
async fn tagging_failure_leaves_only_the_fallback() {
    let server = mockito::Server::new_async().await;
    let model = ScriptedModel::new([ScriptedReply::Fail("connection reset".to_string())]);
    let agent = scripted_agent(&model, &server);

    let outcome = agent
        .handle_turn(Some("s-fail".to_string()), "asdfgh")
        .await
        .unwrap();

    assert_eq!(outcome.stage, TurnStage::Error);
    assert_eq!(outcome.reply, FALLBACK_MESSAGE);
    assert_eq!(model.requests().len(), 1);

    let history = agent.history("s-fail").await.unwrap().unwrap();
    let assistant = history
        .iter()
        .filter(|message| message.role == Role::Assistant)
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>();
    assert_eq!(assistant, vec![FALLBACK_MESSAGE]);
}

#[tokio::test]
async fn malformed_tool_arguments_fall_back() {
    let server = mockito::Server::new_async().await;
    let model = ScriptedModel::new([
        ScriptedReply::Structured(json!({ "name": "Paris", "intent": "hotels" })),
        ScriptedReply::ToolCall(ToolCall {
            name: "get_hotels".to_string(),
            arguments: json!({ "city": "Paris" }),
        }),
    ]);
    let agent = scripted_agent(&model, &server);

    let outcome = agent.handle_turn(None, "hotels in Paris").await.unwrap();

    assert_eq!(outcome.stage, TurnStage::Error);
    assert_eq!(outcome.reply, FALLBACK_MESSAGE);
    assert_eq!(model.remaining(), 0);
}

#[tokio::test]
async fn history_grows_by_two_per_turn() {
    let server = mockito::Server::new_async().await;
    let model = ScriptedModel::new([
        ScriptedReply::Structured(json!({ "name": "Tokyo" })),
        ScriptedReply::Text("Tokyo is the capital of Japan.".to_string()),
        ScriptedReply::Text("Tokyo is Japan's capital city.".to_string()),
        ScriptedReply::Fail("timeout".to_string()),
    ]);
    let agent = scripted_agent(&model, &server);

    for text in ["tell me about Tokyo", "and the airports?"] {
        agent
            .handle_turn(Some("s-grow".to_string()), text)
            .await
            .unwrap();
    }

    let history = agent.history("s-grow").await.unwrap().unwrap();
    let roles = history.iter().map(|message| message.role).collect::<Vec<_>>();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert_eq!(history[1].content, "Tokyo is Japan's capital city.");
    assert_eq!(history[3].content, FALLBACK_MESSAGE);
}
