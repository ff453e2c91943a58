use serde::{Deserialize, Serialize};

/// The response returned to the caller when the reply was synthesized from a
/// chat completions backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CompletionResponse {
    /// Function calls first, in backend order, then at most one message.
    pub output: Vec<Output>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output {
    FunctionCall(OutputFunctionCall),
    Message(OutputMessage),
}

/// A tool call. `call_id` must be echoed back by the caller with the tool result.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct OutputFunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    pub name: String,
    /// JSON-encoded arguments, exactly as the backend produced them.
    pub arguments: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct OutputMessage {
    pub content: Vec<AssistantContent>,
}

/// Note that the text type in comparison to the Completions API is actually `output_text` rather than `text`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantContent {
    OutputText(Text),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Text {
    pub text: String,
}
