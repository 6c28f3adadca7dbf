use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::CONCIERGE_STATUS_HEADER;
use crate::index::IndexError;
use crate::search::QueryError;
use crate::service::ServiceError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ServiceError> for GatewayError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidEvent(msg) => GatewayError::InvalidRequest(msg),
            ServiceError::Store(e) => GatewayError::Store(e),
            ServiceError::Index(e) => GatewayError::Index(e),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::Query(QueryError::EmptyQuery) => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            GatewayError::Query(QueryError::EmbedderUnavailable)
            | GatewayError::Index(IndexError::EmbedderUnavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, "embedder_unavailable")
            }
            GatewayError::Query(QueryError::EmptyIndex) => {
                (StatusCode::SERVICE_UNAVAILABLE, "index_empty")
            }
            GatewayError::Query(QueryError::Embedding(_))
            | GatewayError::Index(IndexError::Embedding(_)) => {
                (StatusCode::BAD_GATEWAY, "embedding_error")
            }
            GatewayError::Index(IndexError::RebuildInProgress) => {
                (StatusCode::CONFLICT, "rebuild_in_progress")
            }
            GatewayError::Index(IndexError::EmptyCorpus) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "empty_corpus")
            }
            GatewayError::Query(_) | GatewayError::Index(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "index_error")
            }
            GatewayError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, label) = self.status();

        let mut headers = HeaderMap::new();
        headers.insert(CONCIERGE_STATUS_HEADER, HeaderValue::from_static(label));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
