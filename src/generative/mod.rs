//! Grounded text completion.
//!
//! [`GenerativeProvider`] is the seam the fallback stage depends on;
//! [`GenaiCompleter`] implements it over any provider `genai` can reach.

mod error;
mod completer;
mod prompt;

#[cfg(any(test, feature = "mock"))]
mod mock;


pub use error::GenerativeError;
pub use completer::GenaiCompleter;
pub use prompt::CompletionPrompt;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;

#[async_trait]
/// Prompt in, text out.
pub trait GenerativeProvider: Send + Sync {
    fn model(&self) -> &str;

    /// One completion request. No retries; failures are returned as-is.
    async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, GenerativeError>;
}

/// Builds the configured completer, or `None` when no model is configured.
pub fn build_generator(config: &Config) -> Option<Arc<dyn GenerativeProvider>> {
    let Some(model) = config.generative_model.as_deref() else {
        info!("No generative model configured; generative fallback disabled");
        return None;
    };
    info!(model, "Generative fallback enabled");
    Some(Arc::new(GenaiCompleter::new(model)))
}
