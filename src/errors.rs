use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::notification::discord::NotifyError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid deployment event: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("request body rejected: {0}")]
    BodyRejected(#[from] BytesRejection),

    #[error("notification delivery failed: {0}")]
    Delivery(#[from] NotifyError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Delivery and internal failures share a status; only the message differs.
        let msg = match &self {
            AppError::Delivery(e) => {
                tracing::warn!(error = %e, "failed to send discord notification");
                "Failed to send Discord notification"
            }
            AppError::BodyRejected(e) => {
                tracing::error!(error = %e, status = %e.status(), "webhook body could not be read");
                "Internal server error"
            }
            AppError::InvalidPayload(e) => {
                tracing::error!(error = %e, "webhook body could not be parsed");
                "Internal server error"
            }
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "webhook handling failed");
                "Internal server error"
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": msg })),
        )
            .into_response()
    }
}
