use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

use super::error::GenerativeError;
use super::prompt::CompletionPrompt;
use super::GenerativeProvider;

/// Completer backed by a `genai` client. Provider credentials come from the
/// environment variables `genai` reads for the chosen model.
pub struct GenaiCompleter {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiCompleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiCompleter")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiCompleter {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl GenerativeProvider for GenaiCompleter {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, GenerativeError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompt.system.clone()),
            ChatMessage::user(prompt.user.clone()),
        ]);
        let options = ChatOptions::default().with_max_tokens(prompt.max_tokens);

        debug!(
            model = %self.model,
            prompt_len = prompt.user.len(),
            "Sending completion request"
        );
        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(GenerativeError::EmptyResponse);
        }
        Ok(text)
    }
}
