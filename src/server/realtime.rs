use crate::server::{AppError, Server};
use tracing::info;

pub const REALTIME_UNSUPPORTED: &str = "Realtime sessions are not supported";

pub(crate) trait RealtimeSessionEndpoint {
    async fn realtime_session() -> AppError;
}

impl RealtimeSessionEndpoint for Server {
    /// Realtime sessions have no chat completions equivalent, whatever backend is configured.
    async fn realtime_session() -> AppError {
        info!("Rejecting realtime session request");
        AppError::Unsupported(REALTIME_UNSUPPORTED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_realtime_session_is_unsupported() {
        let response = <Server as RealtimeSessionEndpoint>::realtime_session()
            .await
            .into_response();

        assert_eq!(response.status(), 400);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(parsed["error"]["message"], REALTIME_UNSUPPORTED);
    }
}
