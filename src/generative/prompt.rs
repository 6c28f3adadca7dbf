use crate::constants::{ASSISTANT_SYSTEM_PROMPT, DEFAULT_COMPLETION_MAX_TOKENS};
use crate::corpus::CorpusEntry;

/// A system/user message pair with a token budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

impl CompletionPrompt {
    /// Prompt answering `query` from `context` Q/A pairs.
    ///
    /// The caller bounds `context`; every pair given is included. With no
    /// context the user message is the bare query.
    pub fn grounded(query: &str, context: &[CorpusEntry]) -> Self {
        let user = if context.is_empty() {
            query.to_string()
        } else {
            let pairs = context
                .iter()
                .map(|e| format!("Q: {}\nA: {}", e.question, e.answer))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{pairs}\n\nQuestion: {query}")
        };

        Self {
            system: ASSISTANT_SYSTEM_PROMPT.to_string(),
            user,
            max_tokens: DEFAULT_COMPLETION_MAX_TOKENS,
        }
    }
}
