use std::sync::Arc;

use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::deployment::DeploymentEvent;
use crate::notification::embed::{create_embed, is_handled};
use crate::AppState;

pub const MSG_NOT_HANDLED: &str = "Event type not handled";
pub const MSG_SENT: &str = "Discord notification sent";
pub const MSG_ACTIVE: &str = "Deployment webhook endpoint is active";

// ── Response DTOs ────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /api/webhook/deployment
///
/// The body is taken as raw bytes so that malformed JSON, and bodies the
/// extractor refuses (e.g. over the size limit), surface as an internal error
/// rather than axum's plain-text rejection.
pub async fn receive_deployment(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let body = body?;
    debug!(body = %String::from_utf8_lossy(&body), "deployment webhook received");

    let event: DeploymentEvent = serde_json::from_slice(&body)?;
    let event_type = &event.event_type;

    if !is_handled(event_type) {
        info!(event_type = %event_type, "event type not handled, skipping");
        return Ok(MessageResponse::new(MSG_NOT_HANDLED));
    }

    info!(
        event_type = %event_type,
        deployment_id = %event.payload.deployment.id,
        project = %event.payload.name,
        "processing deployment event"
    );

    let embed = create_embed(&event)?;
    debug!(embed = ?embed, "created embed");

    state.notifier.send(&embed).await?;

    info!(event_type = %event_type, "discord notification sent");
    Ok(MessageResponse::new(MSG_SENT))
}

/// GET /api/webhook/deployment
pub async fn webhook_status() -> Json<MessageResponse> {
    MessageResponse::new(MSG_ACTIVE)
}
