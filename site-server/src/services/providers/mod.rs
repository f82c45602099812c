//! Chat provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction for the external
//! generative-AI backend, allowing easy swapping between Gemini and a mock.

pub mod gemini;
pub mod mock;

use crate::models::conversation::Conversation;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
///
/// Variants carry the structured classification the HTTP boundary needs;
/// downstream error mapping keys off these rather than error text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Rate limited")]
    RateLimited,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for conversational text providers (e.g., Gemini).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `message` as the next user turn of `conversation` and return the
    /// model's reply text. The conversation itself is not mutated; the caller
    /// decides whether the exchange is recorded.
    async fn send(
        &self,
        conversation: &Conversation,
        message: &str,
    ) -> Result<String, ProviderError>;
}
