use crate::openai::completion::models::{AssistantMessage, ChatMessage, ChatRequest};
use crate::openai::responses::models::prompt_request::{Input, PromptRequest, Role};
use crate::openai::responses::models::prompt_response::{
    AssistantContent, CompletionResponse, Output, OutputFunctionCall, OutputMessage, Text,
};

impl From<PromptRequest> for ChatRequest {
    fn from(value: PromptRequest) -> Self {
        let tools = value.tools().cloned();

        let messages = match value.input {
            Input::Text(text) => vec![ChatMessage {
                role: Some(Role::User),
                content: Some(text.into()),
            }],
            // Only message items have a chat equivalent; everything else is dropped.
            Input::Items(items) => items
                .into_iter()
                .filter(|item| item.is_message())
                .map(|item| ChatMessage {
                    role: item.role,
                    content: item.content,
                })
                .collect(),
        };

        Self {
            model: value.model,
            messages,
            tools,
            stream: false,
        }
    }
}

impl From<AssistantMessage> for CompletionResponse {
    fn from(message: AssistantMessage) -> Self {
        let mut output: Vec<Output> = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| {
                Output::FunctionCall(OutputFunctionCall {
                    call_id: tc.id,
                    name: tc.function.name,
                    arguments: tc.function.arguments,
                })
            })
            .collect();

        if let Some(text) = message.content.filter(|c| !c.is_empty()) {
            output.push(Output::Message(OutputMessage {
                content: vec![AssistantContent::OutputText(Text { text })],
            }));
        }

        Self { output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::completion::models::ChatResponse;
    use serde_json::json;

    fn prompt_request(body: serde_json::Value) -> PromptRequest {
        PromptRequest::try_from(body).expect("Failed to parse PromptRequest")
    }

    fn first_message(body: serde_json::Value) -> AssistantMessage {
        serde_json::from_value::<ChatResponse>(body)
            .expect("Failed to parse ChatResponse")
            .into_first_message()
            .expect("reply should carry choices[0].message")
    }

    #[test]
    fn test_prompt_request_to_chat_request() {
        let request = prompt_request(json!({
            "model": "llama3.1",
            "input": [{"type": "message", "role": "user", "content": "hi"}]
        }));

        let chat_request: ChatRequest = request.into();

        assert_eq!(
            serde_json::to_value(&chat_request).unwrap(),
            json!({
                "model": "llama3.1",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_flatten_keeps_messages_in_order_and_drops_other_items() {
        let request = prompt_request(json!({
            "model": "m",
            "input": [
                {"type": "message", "role": "system", "content": "be terse"},
                {"type": "function_call", "call_id": "c1", "name": "f", "arguments": "{}"},
                {"type": "message", "role": "user", "content": [{"type": "input_text", "text": "first"}]},
                {"type": "function_call_output", "call_id": "c1", "output": "ok"},
                {"role": "user", "content": "typeless items are not messages"},
                {"type": "message", "role": "assistant", "content": "second"}
            ]
        }));

        let chat_request: ChatRequest = request.into();

        let roles: Vec<_> = chat_request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Some(Role::System), Some(Role::User), Some(Role::Assistant)]
        );
        assert_eq!(
            chat_request.messages[1].content,
            Some(json!([{"type": "input_text", "text": "first"}])),
            "structured content must be forwarded untouched"
        );
        assert_eq!(chat_request.messages[2].content, Some(json!("second")));
    }

    #[test]
    fn test_flatten_forwards_tools_and_forces_stream_off() {
        let tools = json!([{
            "type": "function",
            "name": "get_weather",
            "parameters": {"type": "object", "properties": {"city": {"type": "string"}}}
        }]);
        let request = prompt_request(json!({
            "model": "m",
            "stream": true,
            "tools": tools,
            "input": []
        }));

        let chat_request: ChatRequest = request.into();

        assert!(!chat_request.stream);
        assert_eq!(chat_request.tools, Some(tools));
        assert!(chat_request.messages.is_empty());
    }

    #[test]
    fn test_flatten_keeps_explicit_nulls() {
        let request = prompt_request(json!({
            "model": "m",
            "tools": null,
            "input": [{"type": "message", "role": "assistant", "content": null}]
        }));

        let chat_request: ChatRequest = request.into();

        assert_eq!(
            serde_json::to_value(&chat_request).unwrap(),
            json!({
                "model": "m",
                "messages": [{"role": "assistant", "content": null}],
                "tools": null,
                "stream": false
            })
        );
    }

    #[test]
    fn test_flatten_string_input_is_one_user_message() {
        let request = prompt_request(json!({"model": "m", "input": "hello there"}));

        let chat_request: ChatRequest = request.into();

        assert_eq!(
            chat_request.messages,
            vec![ChatMessage {
                role: Some(Role::User),
                content: Some(json!("hello there")),
            }]
        );
    }

    #[test]
    fn test_unflatten_text_only() {
        let message = first_message(json!({
            "choices": [{"message": {"content": "hello"}}]
        }));

        let response: CompletionResponse = message.into();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"output": [{"type": "message", "content": [{"type": "output_text", "text": "hello"}]}]})
        );
    }

    #[test]
    fn test_unflatten_tool_call_only() {
        let message = first_message(json!({
            "choices": [{"message": {"tool_calls": [{"id": "1", "function": {"name": "f", "arguments": "{}"}}]}}]
        }));

        let response: CompletionResponse = message.into();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"output": [{"type": "function_call", "call_id": "1", "name": "f", "arguments": "{}"}]})
        );
    }

    #[test]
    fn test_unflatten_puts_function_calls_before_message() {
        let message = first_message(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "hi",
                "tool_calls": [
                    {"id": "A", "type": "function", "function": {"name": "alpha", "arguments": "{\"x\":1}"}},
                    {"id": "B", "type": "function", "function": {"name": "beta", "arguments": "{}"}}
                ]
            }}]
        }));

        let response: CompletionResponse = message.into();

        assert_eq!(response.output.len(), 3);
        match (&response.output[0], &response.output[1], &response.output[2]) {
            (Output::FunctionCall(a), Output::FunctionCall(b), Output::Message(m)) => {
                assert_eq!(a.call_id.as_deref(), Some("A"));
                assert_eq!(a.name, "alpha");
                assert_eq!(b.call_id.as_deref(), Some("B"));
                assert_eq!(b.name, "beta");
                assert_eq!(
                    m.content,
                    vec![AssistantContent::OutputText(Text {
                        text: "hi".to_string()
                    })]
                );
            }
            other => panic!("unexpected output order: {other:?}"),
        }
    }

    #[test]
    fn test_unflatten_empty_reply_yields_empty_output() {
        for body in [
            json!({"choices": [{"message": {}}]}),
            json!({"choices": [{"message": {"content": ""}}]}),
            json!({"choices": [{"message": {"content": null, "tool_calls": []}}]}),
        ] {
            let response: CompletionResponse = first_message(body).into();
            assert!(response.output.is_empty());
        }
    }

    #[test]
    fn test_unflatten_keeps_arguments_verbatim() {
        // Whitespace, key order and escapes must all survive.
        let raw = "{ \"b\": 2,\n  \"a\": \"\\u00e9\" }";
        let message = first_message(json!({
            "choices": [{"message": {"tool_calls": [{"id": "1", "function": {"name": "f", "arguments": raw}}]}}]
        }));

        let response: CompletionResponse = message.into();

        match &response.output[0] {
            Output::FunctionCall(fc) => assert_eq!(fc.arguments, raw),
            other => panic!("expected a function call, got {other:?}"),
        }
    }
}
