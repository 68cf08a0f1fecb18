use serde_json::json;

use crate::models::ToolSpec;

pub const TAGGER_SYSTEM_PROMPT: &str = "Think carefully, and then tag the text as instructed. Extract the travel destination the user is talking about and the topic they want to discuss. If you are not sure about a field, you can leave it empty.";

pub const EXTRACTOR_SYSTEM_PROMPT: &str =
    "You are a helpful ai designed to extract information about travel destinations.";

pub const SUMMARIZER_SYSTEM_PROMPT: &str = "You are a helpful travel destinations assistant. Answer the user's question in a concise, friendly way using only the information you are given. Do not add places, prices or facts that are not in the information. If the information says that nothing was found or that data could not be retrieved, apologize and explain that the data is not available right now instead of making up an answer.";

pub const USER_INTENT_FUNCTION: &str = "UserIntent";

pub fn user_intent_spec() -> ToolSpec {
    ToolSpec {
        name: USER_INTENT_FUNCTION.to_string(),
        description: "Tag the text with the following information. If you are not sure, you can leave the field empty.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Travel destination that the user is talking about."
                },
                "intent": {
                    "type": "string",
                    "enum": ["airports", "hotels", "restaurants", ""],
                    "description": "The topic the user wants to talk about. \"airports\": the airports near the travel destination. \"hotels\": the hotels near the travel destination. \"restaurants\": the restaurants near the travel destination."
                }
            },
            "required": []
        }),
    }
}

pub fn summarizer_user_prompt(information: &str, original_question: &str) -> String {
    format!("Question: {original_question}\n\nInformation:\n{information}")
}
