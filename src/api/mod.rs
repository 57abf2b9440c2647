use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::AppState;

pub mod handlers;

/// Deployment events are small; anything larger is not from Vercel.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness probes
        .route("/healthz", get(|| async { "ok" }))
        .route("/readyz", get(|| async { "ok" }))
        .route(
            "/api/webhook/deployment",
            get(handlers::webhook_status).post(handlers::receive_deployment),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

/// Middleware: tags every response with a unique X-Request-Id so callers can
/// correlate a failure with the relay's logs.
async fn request_id_middleware(req: Request, next: Next) -> Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", request_id = %req_id);
    let mut resp = next.run(req).instrument(span).await;
    if let Ok(val) = HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}
