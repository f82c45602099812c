//! Chat endpoint: forwards visitor messages to the conversation proxy.

use crate::error::ChatError;
use crate::startup::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Missing field is treated the same as an empty message.
    pub message: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatError> {
    let message = req.message.as_deref().unwrap_or_default();
    let text = state
        .chat
        .handle(message, req.session_id.as_deref())
        .await?;

    Ok(Json(ChatResponse { text }))
}
