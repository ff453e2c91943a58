use crate::backend::Backend;
use crate::config::Config;

pub mod realtime;
pub mod responses;

use self::realtime::*;
use self::responses::*;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::Client;
use std::sync::Arc;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: Client,
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Custom error type for API responses
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Neither backend is configured.
    Misconfigured(String),
    /// A backend call failed. The message is shown to the caller, so it must
    /// not carry backend details.
    InternalServerError(String),
    Unsupported(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request_error", msg),
            AppError::Misconfigured(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error", msg)
            }
            AppError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error", msg)
            }
            AppError::Unsupported(msg) => (StatusCode::BAD_REQUEST, "unsupported_error", msg),
        };

        let body = Json(serde_json::json!({
            "error": {
                "message": error_message,
                "type": error_type,
            }
        }));

        (status, body).into_response()
    }
}

pub struct Server {
    pub addr: String,
    pub router: Router,
}

impl Server {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.server.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        let state = AppState {
            config: config.clone(),
            client,
        };
        let state = Arc::new(state);

        let app = Self::create_router(state.clone());
        let addr = format!("{}:{}", config.server.host, config.server.port);

        Ok(Self { addr, router: app })
    }

    /// Create the Axum router
    fn create_router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/v1/responses", post(Self::responses))
            .route("/api/responses", post(Self::responses))
            .route(
                "/v1/realtime/sessions",
                get(Self::realtime_session).post(Self::realtime_session),
            )
            .route(
                "/api/session",
                get(Self::realtime_session).post(Self::realtime_session),
            )
            .route("/health", get(health_check))
            .with_state(state)
    }

    pub(crate) fn get_backend(state: &AppState) -> Result<Backend, AppError> {
        Backend::select(&state.config).ok_or_else(|| {
            error!("No backend configured: set compat.base_url or native.api_key");
            AppError::Misconfigured(
                "Server misconfigured: set compat.base_url (OLLAMA_BASE_URL) or native.api_key (OPENAI_API_KEY)"
                    .to_string(),
            )
        })
    }
}
