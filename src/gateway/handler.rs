use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use super::CONCIERGE_STAGE_HEADER;
use crate::constants::DEFAULT_RECOMMENDATION_LIMIT;
use crate::documents::EngagementEvent;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::personalize::{EducationRecommendation, Recommendation, Segment};
use crate::search::{QueryResult, SemanticHit};

/// Hits returned by the semantic endpoint when `k` is omitted.
pub const DEFAULT_SEMANTIC_K: usize = 5;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SemanticRequest {
    pub query: String,
    #[serde(default = "default_semantic_k")]
    pub k: usize,
}

fn default_semantic_k() -> usize {
    DEFAULT_SEMANTIC_K
}

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SemanticResponse {
    pub hits: Vec<SemanticHit>,
}

#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub user_id: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub user_id: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct EducationResponse {
    pub user_id: String,
    pub recommendations: Vec<EducationRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct RecordedResponse {
    pub status: &'static str,
}

fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

fn staged_response(result: QueryResult) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONCIERGE_STAGE_HEADER,
        HeaderValue::from_static(result.stage.as_str()),
    );
    (StatusCode::OK, headers, Json(result)).into_response()
}

#[instrument(skip(state, body))]
pub async fn search_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: SearchRequest = parse_body(body)?;
    let result = state.concierge.query(&request.query).await?;
    debug!(stage = %result.stage, "Search answered");
    Ok(staged_response(result))
}

#[instrument(skip(state, body))]
pub async fn ask_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: SearchRequest = parse_body(body)?;
    let result = state.concierge.ask(&request.query).await?;
    Ok(staged_response(result))
}

#[instrument(skip(state, body))]
pub async fn semantic_search_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SemanticResponse>, GatewayError> {
    let request: SemanticRequest = parse_body(body)?;
    let hits = state
        .concierge
        .semantic_search(&request.query, request.k)
        .await?;
    Ok(Json(SemanticResponse { hits }))
}

#[instrument(skip(state))]
pub async fn rebuild_handler(State(state): State<HandlerState>) -> Result<Response, GatewayError> {
    let status = state.concierge.rebuild_index().await?;
    Ok((StatusCode::OK, Json(status)).into_response())
}

#[instrument(skip(state))]
pub async fn segments_handler(
    State(state): State<HandlerState>,
    Path(user_id): Path<String>,
) -> Json<SegmentsResponse> {
    let segments = state.concierge.segments(&user_id).await;
    Json(SegmentsResponse {
        user_id,
        segments: segments.into_iter().collect(),
    })
}

#[instrument(skip(state))]
pub async fn recommendations_handler(
    State(state): State<HandlerState>,
    Path(user_id): Path<String>,
    Query(params): Query<RecommendParams>,
) -> Json<RecommendationsResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);
    let recommendations = state.concierge.recommend(&user_id, limit).await;
    Json(RecommendationsResponse {
        user_id,
        recommendations,
    })
}

#[instrument(skip(state))]
pub async fn education_handler(
    State(state): State<HandlerState>,
    Path(user_id): Path<String>,
) -> Json<EducationResponse> {
    let recommendations = state.concierge.education_recommendations(&user_id).await;
    Json(EducationResponse {
        user_id,
        recommendations,
    })
}

#[instrument(skip(state, body))]
pub async fn engagement_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let event: EngagementEvent = parse_body(body)?;
    state.concierge.record_engagement(event).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(RecordedResponse { status: "recorded" }),
    )
        .into_response())
}
