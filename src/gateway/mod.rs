//! Thin HTTP surface (Axum) over [`Concierge`](crate::service::Concierge).

pub mod error;
pub mod handler;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use state::HandlerState;

use handler::{
    ask_handler, education_handler, engagement_handler, rebuild_handler,
    recommendations_handler, search_handler, segments_handler, semantic_search_handler,
};

/// Pipeline stage that answered a search (`VECTOR`, `KEYWORD`, ...).
pub const CONCIERGE_STAGE_HEADER: &str = "x-concierge-stage";

/// Coarse status of health, readiness and error responses.
pub const CONCIERGE_STATUS_HEADER: &str = "x-concierge-status";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/admin/index/rebuild", post(rebuild_handler))
        .route("/v1/search", post(search_handler))
        .route("/v1/search/semantic", post(semantic_search_handler))
        .route("/v1/ask", post(ask_handler))
        .route("/v1/users/{id}/segments", get(segments_handler))
        .route("/v1/users/{id}/recommendations", get(recommendations_handler))
        .route("/v1/users/{id}/education", get(education_handler))
        .route("/v1/engagements", post(engagement_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub store: &'static str,
    pub index: &'static str,
    pub index_entries: usize,
    pub embedder: Option<String>,
    pub generative_model: Option<String>,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CONCIERGE_STATUS_HEADER, HeaderValue::from_static("healthy"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Ready once the document store answers. An empty index is reported but does
/// not block readiness: keyword and generative stages still serve.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let concierge = &state.concierge;

    let store_status = match concierge.store().services().await {
        Ok(_) => "ready",
        Err(e) => {
            tracing::warn!(error = %e, "Document store not reachable");
            "error"
        }
    };

    let index = concierge.index_status();
    let components = ComponentStatus {
        http: "ready",
        store: store_status,
        index: if index.entries > 0 { "ready" } else { "empty" },
        index_entries: index.entries,
        embedder: concierge.embedder_id().map(str::to_string),
        generative_model: concierge.generative_model().map(str::to_string),
    };

    let is_ready = components.store == "ready";
    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "pending")
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONCIERGE_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
