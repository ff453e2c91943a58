use crate::openai::responses::models::prompt_request::PromptRequest;
use crate::server::{AppError, AppState, Server};
use axum::{Json, extract::State};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const BACKEND_FAILURE: &str = "Failed to get a response from the backend";

pub(crate) trait ResponsesEndpoint {
    async fn responses(
        state: State<Arc<AppState>>,
        request_as_text: String,
    ) -> Result<Json<Value>, AppError>;
}

impl ResponsesEndpoint for Server {
    async fn responses(
        State(state): State<Arc<AppState>>,
        request_as_text: String,
    ) -> Result<Json<Value>, AppError> {
        // Pick the backend before looking at the body: an unconfigured server
        // fails the same way for every request.
        let backend = Self::get_backend(&state)?;

        let request_as_value: Value = serde_json::from_str(&request_as_text).map_err(|e| {
            error!("Failed to parse request body as JSON: {}", e);
            AppError::BadRequest(format!("Invalid JSON: {}", e))
        })?;

        let request = PromptRequest::try_from(request_as_value).map_err(|e| {
            error!("Failed to deserialize request into PromptRequest: {}", e);
            AppError::BadRequest(format!("Invalid request structure: {}", e))
        })?;

        debug!(
            "original_openai_request:\n{}",
            serde_json::to_string_pretty(request.body()).unwrap_or_default()
        );

        if request.stream {
            debug!("Caller asked for streaming; answering with a complete response instead");
        }

        let model = request.model.clone();
        let response = backend
            .relay(&state.client, request)
            .await
            .map_err(|e| {
                error!("{} backend failed for model {}: {:#}", backend.name(), model, e);
                AppError::InternalServerError(BACKEND_FAILURE.to_string())
            })?;

        debug!(
            "openai_response:\n{}",
            serde_json::to_string_pretty(&response).unwrap_or_default()
        );

        info!(
            "Successfully processed responses request for model {} via {} backend",
            model,
            backend.name()
        );

        Ok(Json(response))
    }
}
