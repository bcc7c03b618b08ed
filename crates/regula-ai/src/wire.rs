//! Request and response bodies for the supported backend APIs.
//!
//! OpenAI and Groq share the chat-completions shape; Anthropic uses its
//! messages API. Only the fields regula reads or writes are modelled.

use serde::{Deserialize, Serialize};

use crate::error::BackendError;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

// ── OpenAI-compatible chat completions ──

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Content of the first choice in a chat-completions response body.
pub fn parse_chat_completion(body: &str) -> Result<String, BackendError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(BackendError::NoCompletion)
}

// ── Anthropic messages ──

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Text of the first `text` content block in a messages response body.
pub fn parse_messages(body: &str) -> Result<String, BackendError> {
    let response: MessagesResponse = serde_json::from_str(body)?;
    response
        .content
        .into_iter()
        .find(|b| b.kind == "text")
        .and_then(|b| b.text)
        .ok_or(BackendError::NoCompletion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_body() {
        let req = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage::user("convert this")],
            temperature: 0.0,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "convert this"}],
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn messages_request_body() {
        let req = MessagesRequest {
            model: "claude-3-5-haiku-latest",
            max_tokens: 1024,
            messages: vec![ChatMessage::user("convert this")],
            temperature: 0.0,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["max_tokens"], 1024);
        assert_eq!(v["messages"][0]["role"], "user");
    }

    #[test]
    fn chat_completion_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"conditions\": {}}"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        assert_eq!(parse_chat_completion(body).unwrap(), r#"{"conditions": {}}"#);
    }

    #[test]
    fn chat_completion_without_choices() {
        let err = parse_chat_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, BackendError::NoCompletion));
    }

    #[test]
    fn chat_completion_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(matches!(
            parse_chat_completion(body).unwrap_err(),
            BackendError::NoCompletion
        ));
    }

    #[test]
    fn chat_completion_garbage_body() {
        assert!(matches!(
            parse_chat_completion("<html>bad gateway</html>").unwrap_err(),
            BackendError::Json(_)
        ));
    }

    #[test]
    fn messages_first_text_block() {
        let body = r#"{
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Here is the rule: {}"}
            ],
            "stop_reason": "end_turn"
        }"#;
        assert_eq!(parse_messages(body).unwrap(), "Here is the rule: {}");
    }

    #[test]
    fn messages_without_text() {
        let body = r#"{"content": [{"type": "tool_use", "id": "t", "name": "x", "input": {}}]}"#;
        assert!(matches!(
            parse_messages(body).unwrap_err(),
            BackendError::NoCompletion
        ));
    }
}
