use crate::backend::{Dialect, normalize_base_url};
use crate::openai::completion::models::{AssistantMessage, ChatRequest, ChatResponse};
use crate::openai::responses::models::prompt_request::PromptRequest;
use crate::openai::responses::models::prompt_response::CompletionResponse;
use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::debug;

/// An OpenAI-compatible chat completions backend, such as Ollama.
#[derive(Debug, Clone)]
pub struct CompatBackend {
    base_url: String,
}

impl CompatBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Dialect for CompatBackend {
    type Outbound = ChatRequest;
    type Reply = AssistantMessage;
    type Output = CompletionResponse;

    fn transform_request(&self, request: PromptRequest) -> ChatRequest {
        request.into()
    }

    async fn invoke(&self, client: &Client, request: ChatRequest) -> Result<AssistantMessage> {
        let url = self.chat_completions_url();

        debug!(
            "chat_request:\n{}",
            serde_json::to_string_pretty(&request).unwrap_or_default()
        );

        let response = client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            bail!("Chat completions backend returned error: {} - {}", status, error_text);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completions response")?;

        debug!(
            "chat_response:\n{}",
            serde_json::to_string_pretty(&chat_response).unwrap_or_default()
        );

        chat_response
            .into_first_message()
            .context("Chat completions response has no choices[0].message")
    }

    fn transform_response(&self, message: AssistantMessage) -> CompletionResponse {
        message.into()
    }
}
