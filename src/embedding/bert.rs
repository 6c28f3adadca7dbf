//! BERT-family sentence embedder (mean pooling over the attention mask).
//!
//! Expects a model directory with `config.json`, `model.safetensors` and
//! `tokenizer.json`, as published for the MiniLM/BGE families.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::device::select_device;
use super::error::EmbeddingError;
use super::utils::load_tokenizer;
use super::{EmbeddingProvider, l2_normalize};
use crate::constants::DEFAULT_MAX_SEQ_LEN;

struct BertInner {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

/// Local embedder. Inference runs on the blocking pool.
#[derive(Clone)]
pub struct BertEmbedder {
    inner: Arc<BertInner>,
    id: String,
    dimension: usize,
}

impl std::fmt::Debug for BertEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEmbedder")
            .field("id", &self.id)
            .field("device", &format!("{:?}", self.inner.device))
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl BertEmbedder {
    pub fn load(model_dir: &Path) -> Result<Self, EmbeddingError> {
        if !model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: model_dir.to_path_buf(),
            });
        }

        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");
        for required in [&config_path, &weights_path] {
            if !required.exists() {
                return Err(EmbeddingError::ModelNotFound {
                    path: required.clone(),
                });
            }
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for embedder");

        let config_content = std::fs::read_to_string(&config_path)?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to parse {}: {e}", config_path.display()),
            })?;

        // SAFETY: the weights file is only read, and not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)?
        };
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)
        } else {
            BertModel::load(vb, &config)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to load BERT weights: {e}"),
        })?;

        let tokenizer = load_tokenizer(model_dir, DEFAULT_MAX_SEQ_LEN).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("failed to load tokenizer: {e}"),
            }
        })?;

        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bert".to_string());
        let dimension = config.hidden_size;
        let id = format!("local:{name}:{dimension}");

        info!(
            model_dir = %model_dir.display(),
            dimension,
            num_layers = config.num_hidden_layers,
            "Local embedder loaded"
        );

        Ok(Self {
            inner: Arc::new(BertInner {
                model,
                tokenizer,
                device,
            }),
            id,
            dimension,
        })
    }

    fn embed_blocking(inner: &BertInner, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            inner
                .tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Err(EmbeddingError::InferenceFailed {
                reason: "text produced no tokens".to_string(),
            });
        }

        let input_ids = Tensor::new(ids, &inner.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let mask = Tensor::new(encoding.get_attention_mask(), &inner.device)?.unsqueeze(0)?;

        // [1, seq, hidden]
        let hidden = inner
            .model
            .forward(&input_ids, &token_type_ids, Some(&mask))?;

        let mask = mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?.squeeze(0)?;

        let mut vector = pooled.to_vec1::<f32>()?;
        l2_normalize(&mut vector);
        Ok(vector)
    }

    async fn run_blocking(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            texts
                .iter()
                .map(|t| Self::embed_blocking(&inner, t))
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(|e| EmbeddingError::InferenceFailed {
            reason: format!("embedding task failed: {e}"),
        })?
    }
}

#[async_trait]
impl EmbeddingProvider for BertEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut out = self.run_blocking(vec![text.to_string()]).await?;
        out.pop().ok_or_else(|| EmbeddingError::InferenceFailed {
            reason: "no embedding produced".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run_blocking(texts.to_vec()).await
    }
}
