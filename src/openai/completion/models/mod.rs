mod utils;

use crate::openai::responses::models::prompt_request::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat completion request sent to an OpenAI-compatible backend
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Forwarded as the caller sent them, `null` included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
    pub stream: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

/// Chat completion response from an OpenAI-compatible backend.
/// Only the parts the relay reads are modeled.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<AssistantMessage>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Tool call made by the assistant
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: FunctionCall,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl ChatResponse {
    /// `choices[0].message`, the only part of the reply that carries output.
    pub fn into_first_message(self) -> Option<AssistantMessage> {
        self.choices.into_iter().next().and_then(|c| c.message)
    }
}
