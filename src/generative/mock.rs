//! Scriptable completer for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::GenerativeError;
use super::prompt::CompletionPrompt;
use super::GenerativeProvider;

/// Returns a fixed reply, counts calls and remembers the last prompt.
#[derive(Debug)]
pub struct MockGenerator {
    reply: Mutex<String>,
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    last_prompt: Mutex<Option<CompletionPrompt>>,
}

impl MockGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Mutex::new(reply.into()),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            delay: Mutex::new(None),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn set_reply(&self, reply: impl Into<String>) {
        *self.reply.lock() = reply.into();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<CompletionPrompt> {
        self.last_prompt.lock().clone()
    }
}

#[async_trait]
impl GenerativeProvider for MockGenerator {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, GenerativeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(GenerativeError::Request {
                reason: "mock generator failure".to_string(),
            });
        }

        let reply = self.reply.lock().clone();
        if reply.trim().is_empty() {
            return Err(GenerativeError::EmptyResponse);
        }
        Ok(reply)
    }
}
