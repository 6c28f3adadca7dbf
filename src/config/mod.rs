//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CONCIERGE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CONTEXT_PAIRS, DEFAULT_EMBED_BATCH_SIZE, DEFAULT_EMBED_CACHE_CAPACITY,
    DEFAULT_EMBED_TIMEOUT, DEFAULT_GENERATIVE_TIMEOUT, DEFAULT_KEYWORD_TIMEOUT, DEFAULT_LANGUAGE,
    DEFAULT_VECTOR_TIMEOUT,
};
use crate::personalize::RankingWeights;

/// Which embedding backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedderKind {
    /// Local BERT-family model loaded with candle.
    Local,
    /// OpenAI-compatible `/embeddings` endpoint.
    Remote,
    /// Deterministic hash vectors. Degraded mode, logged loudly.
    Stub,
    /// No embedder: the vector stage reports itself unavailable.
    #[default]
    None,
}

impl FromStr for EmbedderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "stub" => Ok(Self::Stub),
            "none" | "" => Ok(Self::None),
            _ => Err(ConfigError::UnknownEmbedder {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Stub => "stub",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CONCIERGE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the persisted vector/metadata pair. Default: `./.data/index`.
    pub index_dir: PathBuf,

    /// JSON seed for the in-memory document store.
    pub seed_path: Option<PathBuf>,

    /// Language used for corpus text and keyword matching. Default: `en`.
    pub language: String,

    pub embedder: EmbedderKind,

    /// Local model directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    pub model_dir: Option<PathBuf>,

    /// Base URL of the OpenAI-compatible embeddings API.
    pub embed_url: String,

    pub embed_model: String,

    pub embed_api_key: Option<String>,

    /// Output dimension for the remote and stub embedders.
    pub embed_dim: Option<usize>,

    /// Query-embedding cache entries. `0` disables the cache.
    pub embed_cache_capacity: u64,

    /// Inputs per remote embedding request during a rebuild. Default: `64`.
    pub embed_batch_size: usize,

    /// HTTP timeout for one remote embedding request. The vector stage still
    /// bounds query-time calls with `vector_timeout`.
    pub embed_timeout: Duration,

    /// Model name handed to genai. Unset leaves the generative stage unavailable.
    pub generative_model: Option<String>,

    pub vector_timeout: Duration,
    pub keyword_timeout: Duration,
    pub generative_timeout: Duration,

    /// Question/answer pairs handed to the generative stage. Default: `20`.
    pub context_pairs: usize,

    pub ranking: RankingWeights,
}

/// Default base URL used when `CONCIERGE_EMBED_URL` is not set.
pub const DEFAULT_EMBED_URL: &str = "https://api.openai.com/v1";

/// Default remote embedding model.
pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            index_dir: PathBuf::from("./.data/index"),
            seed_path: None,
            language: DEFAULT_LANGUAGE.to_string(),
            embedder: EmbedderKind::None,
            model_dir: None,
            embed_url: DEFAULT_EMBED_URL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            embed_api_key: None,
            embed_dim: None,
            embed_cache_capacity: DEFAULT_EMBED_CACHE_CAPACITY,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            generative_model: None,
            vector_timeout: DEFAULT_VECTOR_TIMEOUT,
            keyword_timeout: DEFAULT_KEYWORD_TIMEOUT,
            generative_timeout: DEFAULT_GENERATIVE_TIMEOUT,
            context_pairs: DEFAULT_CONTEXT_PAIRS,
            ranking: RankingWeights::default(),
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "CONCIERGE_PORT";
    const ENV_BIND_ADDR: &'static str = "CONCIERGE_BIND_ADDR";
    const ENV_INDEX_DIR: &'static str = "CONCIERGE_INDEX_DIR";
    const ENV_SEED_PATH: &'static str = "CONCIERGE_SEED_PATH";
    const ENV_LANGUAGE: &'static str = "CONCIERGE_LANGUAGE";
    const ENV_EMBEDDER: &'static str = "CONCIERGE_EMBEDDER";
    const ENV_MODEL_DIR: &'static str = "CONCIERGE_MODEL_DIR";
    const ENV_EMBED_URL: &'static str = "CONCIERGE_EMBED_URL";
    const ENV_EMBED_MODEL: &'static str = "CONCIERGE_EMBED_MODEL";
    const ENV_EMBED_API_KEY: &'static str = "CONCIERGE_EMBED_API_KEY";
    const ENV_EMBED_DIM: &'static str = "CONCIERGE_EMBED_DIM";
    const ENV_EMBED_CACHE: &'static str = "CONCIERGE_EMBED_CACHE";
    const ENV_EMBED_BATCH: &'static str = "CONCIERGE_EMBED_BATCH";
    const ENV_EMBED_TIMEOUT_MS: &'static str = "CONCIERGE_EMBED_TIMEOUT_MS";
    const ENV_GENERATIVE_MODEL: &'static str = "CONCIERGE_GENERATIVE_MODEL";
    const ENV_VECTOR_TIMEOUT_MS: &'static str = "CONCIERGE_VECTOR_TIMEOUT_MS";
    const ENV_KEYWORD_TIMEOUT_MS: &'static str = "CONCIERGE_KEYWORD_TIMEOUT_MS";
    const ENV_GENERATIVE_TIMEOUT_MS: &'static str = "CONCIERGE_GENERATIVE_TIMEOUT_MS";
    const ENV_CONTEXT_PAIRS: &'static str = "CONCIERGE_CONTEXT_PAIRS";
    const ENV_SEGMENT_WEIGHT: &'static str = "CONCIERGE_SEGMENT_WEIGHT";
    const ENV_INTEREST_WEIGHT: &'static str = "CONCIERGE_INTEREST_WEIGHT";
    const ENV_FRESH_BONUS: &'static str = "CONCIERGE_FRESH_BONUS";
    const ENV_FRESH_DAYS: &'static str = "CONCIERGE_FRESH_DAYS";
    const ENV_RECENT_BONUS: &'static str = "CONCIERGE_RECENT_BONUS";
    const ENV_RECENT_DAYS: &'static str = "CONCIERGE_RECENT_DAYS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let embedder = match env::var(Self::ENV_EMBEDDER) {
            Ok(value) => value.parse()?,
            Err(_) => defaults.embedder,
        };

        let ranking = RankingWeights {
            segment_weight: Self::parse_num_from_env(
                Self::ENV_SEGMENT_WEIGHT,
                defaults.ranking.segment_weight,
            ),
            interest_weight: Self::parse_num_from_env(
                Self::ENV_INTEREST_WEIGHT,
                defaults.ranking.interest_weight,
            ),
            fresh_bonus: Self::parse_num_from_env(Self::ENV_FRESH_BONUS, defaults.ranking.fresh_bonus),
            fresh_days: Self::parse_num_from_env(Self::ENV_FRESH_DAYS, defaults.ranking.fresh_days),
            recent_bonus: Self::parse_num_from_env(
                Self::ENV_RECENT_BONUS,
                defaults.ranking.recent_bonus,
            ),
            recent_days: Self::parse_num_from_env(Self::ENV_RECENT_DAYS, defaults.ranking.recent_days),
        };

        Ok(Self {
            port,
            bind_addr,
            index_dir: Self::parse_path_from_env(Self::ENV_INDEX_DIR, defaults.index_dir),
            seed_path: Self::parse_optional_from_env(Self::ENV_SEED_PATH).map(PathBuf::from),
            language: Self::parse_optional_from_env(Self::ENV_LANGUAGE)
                .map(|v| v.to_ascii_lowercase())
                .unwrap_or(defaults.language),
            embedder,
            model_dir: Self::parse_optional_from_env(Self::ENV_MODEL_DIR).map(PathBuf::from),
            embed_url: Self::parse_optional_from_env(Self::ENV_EMBED_URL)
                .unwrap_or(defaults.embed_url),
            embed_model: Self::parse_optional_from_env(Self::ENV_EMBED_MODEL)
                .unwrap_or(defaults.embed_model),
            embed_api_key: Self::parse_optional_from_env(Self::ENV_EMBED_API_KEY),
            embed_dim: Self::parse_optional_from_env(Self::ENV_EMBED_DIM)
                .and_then(|v| v.parse().ok())
                .filter(|dim: &usize| *dim > 0),
            embed_cache_capacity: Self::parse_num_from_env(
                Self::ENV_EMBED_CACHE,
                defaults.embed_cache_capacity,
            ),
            embed_batch_size: Some(Self::parse_num_from_env(
                Self::ENV_EMBED_BATCH,
                defaults.embed_batch_size,
            ))
            .filter(|size| *size > 0)
            .unwrap_or(defaults.embed_batch_size),
            embed_timeout: Self::parse_timeout_from_env(
                Self::ENV_EMBED_TIMEOUT_MS,
                defaults.embed_timeout,
            ),
            generative_model: Self::parse_optional_from_env(Self::ENV_GENERATIVE_MODEL),
            vector_timeout: Self::parse_timeout_from_env(
                Self::ENV_VECTOR_TIMEOUT_MS,
                defaults.vector_timeout,
            ),
            keyword_timeout: Self::parse_timeout_from_env(
                Self::ENV_KEYWORD_TIMEOUT_MS,
                defaults.keyword_timeout,
            ),
            generative_timeout: Self::parse_timeout_from_env(
                Self::ENV_GENERATIVE_TIMEOUT_MS,
                defaults.generative_timeout,
            ),
            context_pairs: Self::parse_num_from_env(Self::ENV_CONTEXT_PAIRS, defaults.context_pairs),
            ranking,
        })
    }

    /// Validates paths and backend prerequisites (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_dir.exists() && !self.index_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.index_dir.clone(),
            });
        }

        if let Some(ref path) = self.seed_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        match self.embedder {
            EmbedderKind::Local => {
                let Some(ref path) = self.model_dir else {
                    return Err(ConfigError::MissingEnvVar {
                        name: Self::ENV_MODEL_DIR,
                    });
                };
                if !path.exists() {
                    return Err(ConfigError::PathNotFound { path: path.clone() });
                }
                if !path.is_dir() {
                    return Err(ConfigError::NotADirectory { path: path.clone() });
                }
            }
            EmbedderKind::Remote => {
                if self.embed_api_key.is_none() {
                    return Err(ConfigError::MissingEnvVar {
                        name: Self::ENV_EMBED_API_KEY,
                    });
                }
            }
            EmbedderKind::Stub | EmbedderKind::None => {}
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        Self::parse_optional_from_env(var_name)
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_optional_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_num_from_env<T: FromStr>(var_name: &str, default: T) -> T {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_timeout_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(default)
    }
}
