use crate::models::UserIntent;

pub const CHECKING_MESSAGE: &str = "Let me check that for you...";

pub const FALLBACK_MESSAGE: &str = "I was not able to process the request. I am a travel destinations bot and I can only answer questions about travel destinations.";

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn build_information_query(intent: &UserIntent) -> String {
    match intent.intent {
        Some(topic) => format!(
            "I want to know about the travel destination with name {} and want to talk about the {}.",
            intent.name, topic
        ),
        None => format!(
            "I want to know about the travel destination with name {}.",
            intent.name
        ),
    }
}

pub fn acknowledgement(intent: &UserIntent) -> String {
    match intent.intent {
        Some(topic) => format!(
            "Got it! You want to know about {} and want to talk about the {}.",
            intent.name, topic
        ),
        None => format!("Got it! You want to know about {}.", intent.name),
    }
}
