use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

// User-facing copy. Raw provider wording only ever travels in `details`.
const EMPTY_MESSAGE_TEXT: &str = "Mensaje requerido";
const RATE_LIMITED_TEXT: &str =
    "Estamos recibiendo muchas consultas en este momento. Inténtalo de nuevo en unos minutos.";
const MODEL_UNAVAILABLE_TEXT: &str =
    "El asistente no está disponible en este momento. Escríbenos a través del formulario de contacto.";
const UPSTREAM_TEXT: &str =
    "Lo sentimos, estamos teniendo dificultades técnicas. Inténtalo más tarde.";

/// Failures surfaced by the chat endpoint, one variant per user-facing
/// category.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("empty message")]
    EmptyMessage,

    #[error("rate limited: {details}")]
    RateLimited { details: String },

    #[error("model unavailable: {details}")]
    ModelUnavailable { details: String },

    #[error("upstream failure: {details}")]
    Upstream { details: String },
}

/// Classification of provider failures. Total: every failure maps to exactly
/// one category. Keys off the structured variants the provider client
/// produces; the `"429"` substring check is a compatibility shim for upstream
/// stacks that only surface the status inside the error text.
impl From<ProviderError> for ChatError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RateLimited | ProviderError::ApiError { status: 429, .. } => {
                ChatError::RateLimited {
                    details: "Rate limit".to_string(),
                }
            }
            ProviderError::ModelNotFound(detail) => {
                ChatError::ModelUnavailable { details: detail }
            }
            ProviderError::ApiError {
                status: 404,
                message,
            } => ChatError::ModelUnavailable { details: message },
            ProviderError::ApiError { ref message, .. } | ProviderError::NetworkError(ref message)
                if message.contains("429") =>
            {
                ChatError::RateLimited {
                    details: "Rate limit".to_string(),
                }
            }
            other => ChatError::Upstream {
                details: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error_message, details) = match self {
            ChatError::EmptyMessage => (StatusCode::BAD_REQUEST, EMPTY_MESSAGE_TEXT, None),
            ChatError::RateLimited { details } => {
                (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_TEXT, Some(details))
            }
            ChatError::ModelUnavailable { details } => {
                (StatusCode::NOT_FOUND, MODEL_UNAVAILABLE_TEXT, Some(details))
            }
            ChatError::Upstream { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                UPSTREAM_TEXT,
                Some(details),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message.to_string(),
                details,
            }),
        )
            .into_response()
    }
}

/// Startup and configuration failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
