use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use trademind_backtest::EngineError;

/// Errors returned to API clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request violated the simulation contract.
    #[error(transparent)]
    InvalidRequest(EngineError),
    /// Something failed on our side; the message is only logged.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        if err.is_invalid_input() {
            Self::InvalidRequest(err)
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::InvalidRequest(err) => {
                tracing::warn!(error = %err, "rejected simulation request");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "simulation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Simulation failed".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "detail": detail });

        (status, Json(body)).into_response()
    }
}
