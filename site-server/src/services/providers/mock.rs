//! Mock provider implementation for testing.

use super::{ChatProvider, ProviderError};
use crate::models::conversation::Conversation;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// What the mock observed on one call, for assertions on session continuity.
#[derive(Debug, Clone)]
pub struct SeenCall {
    pub system_instruction: String,
    pub history_len: usize,
    pub message: String,
}

/// Scripted chat provider: pops one result per call and records what it saw.
/// When the script runs dry it echoes the prompt, matching the behavior the
/// real provider has of always answering something.
pub struct MockChatProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<SeenCall>>,
}

impl MockChatProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A provider that echoes every message.
    pub fn echoing() -> Self {
        Self::new(Vec::new())
    }

    /// Number of times `send` was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Everything the provider observed, in call order.
    pub async fn seen(&self) -> Vec<SeenCall> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn send(
        &self,
        conversation: &Conversation,
        message: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().await.push(SeenCall {
            system_instruction: conversation.system_instruction.clone(),
            history_len: conversation.turns.len(),
            message: message.to_string(),
        });

        match self.script.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(format!("Mock response for: {}", message)),
        }
    }
}
