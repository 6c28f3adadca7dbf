//! OpenAI-compatible embeddings client.
//!
//! Batches are split into requests of at most `batch_size` inputs, sent in
//! order. No retries: a failed request fails the whole call, and the
//! orchestrator moves on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmbeddingProvider;
use super::error::EmbeddingError;
use crate::config::Config;
use crate::constants::{DEFAULT_EMBED_BATCH_SIZE, validate_embedding_dim};

/// Dimension assumed for the remote model when none is configured.
pub const DEFAULT_REMOTE_DIM: usize = 1_536;

#[derive(Debug, Clone)]
pub struct RemoteEmbedderConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Sent as `dimensions` when set explicitly.
    pub dimensions: Option<usize>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Maximum inputs per request. `0` falls back to the default.
    pub batch_size: usize,
}

impl RemoteEmbedderConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.embed_url.clone(),
            model: config.embed_model.clone(),
            api_key: config.embed_api_key.clone(),
            dimensions: config.embed_dim,
            timeout: config.embed_timeout,
            batch_size: config.embed_batch_size,
        }
    }
}

pub struct RemoteEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    requested_dimensions: Option<usize>,
    dimension: usize,
    batch_size: usize,
    id: String,
}

impl std::fmt::Debug for RemoteEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEmbedder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl RemoteEmbedder {
    pub fn new(config: RemoteEmbedderConfig) -> Result<Self, EmbeddingError> {
        if config.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "remote embedding model name is empty".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref() {
            let auth = HeaderValue::from_str(&format!("Bearer {}", key.trim())).map_err(|e| {
                EmbeddingError::InvalidConfig {
                    reason: format!("invalid API key header: {e}"),
                }
            })?;
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let dimension = config.dimensions.unwrap_or(DEFAULT_REMOTE_DIM);
        let id = format!("remote:{}:{}", config.model, dimension);

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model,
            requested_dimensions: config.dimensions,
            dimension,
            batch_size: match config.batch_size {
                0 => DEFAULT_EMBED_BATCH_SIZE,
                n => n,
            },
            id,
        })
    }

    async fn request(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(inputs = inputs.len(), endpoint = %self.endpoint, "Remote embedding request");

        let body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
            dimensions: self.requested_dimensions,
        };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbeddingError::Request {
                reason: format!("status {status}: {text}"),
            });
        }

        let mut parsed: EmbeddingResponse = response.json().await?;
        parsed.data.sort_by_key(|entry| entry.index);
        if parsed.data.len() != inputs.len() {
            return Err(EmbeddingError::Request {
                reason: format!(
                    "received {} embeddings for {} inputs",
                    parsed.data.len(),
                    inputs.len()
                ),
            });
        }

        parsed
            .data
            .into_iter()
            .map(|entry| -> Result<Vec<f32>, EmbeddingError> {
                validate_embedding_dim(entry.embedding.len(), self.dimension)?;
                Ok(entry.embedding)
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut out = self.request(&[text]).await?;
        out.pop().ok_or_else(|| EmbeddingError::Request {
            reason: "empty embedding response".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            let inputs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            out.extend(self.request(&inputs).await?);
        }
        debug!(
            inputs = texts.len(),
            requests = texts.len().div_ceil(self.batch_size),
            "Remote embedding batch complete"
        );
        Ok(out)
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}
