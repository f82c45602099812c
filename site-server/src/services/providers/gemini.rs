//! Gemini chat provider.
//!
//! Implements multi-turn text generation using Google's Gemini API. The REST
//! API is stateless, so every call replays the full conversation history plus
//! the new user turn, with the system instruction attached alongside.

use super::{ChatProvider, ProviderError};
use crate::models::conversation::{Conversation, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

/// Gemini chat provider.
pub struct GeminiChatProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiChatProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Build the API URL for the configured model.
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, self.config.model, self.config.api_key
        )
    }

    /// Build the request payload: history turns followed by the new user turn.
    fn build_request(conversation: &Conversation, message: &str) -> GenerateContentRequest {
        let mut contents: Vec<Content> = conversation
            .turns
            .iter()
            .map(|turn| Content {
                role: Some(role_name(turn.role).to_string()),
                parts: vec![ContentPart {
                    text: turn.text.clone(),
                }],
            })
            .collect();

        contents.push(Content {
            role: Some("user".to_string()),
            parts: vec![ContentPart {
                text: message.to_string(),
            }],
        });

        GenerateContentRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![ContentPart {
                    text: conversation.system_instruction.clone(),
                }],
            }),
        }
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

#[async_trait]
impl ChatProvider for GeminiChatProvider {
    async fn send(
        &self,
        conversation: &Conversation,
        message: &str,
    ) -> Result<String, ProviderError> {
        let request = Self::build_request(conversation, message);
        let url = self.api_url();

        tracing::debug!(
            model = %self.config.model,
            history_len = conversation.turns.len(),
            message_len = message.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status {
                429 => ProviderError::RateLimited,
                404 => ProviderError::ModelNotFound(format!(
                    "model {}: {}",
                    self.config.model, error_text
                )),
                _ => ProviderError::ApiError {
                    status,
                    message: error_text,
                },
            });
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("no text candidate in response".to_string())
            })
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}
