//! Application startup and lifecycle management.

use crate::config::SiteConfig;
use crate::error::AppError;
use crate::handlers::{chat::chat, contact::contact, health::health_check};
use crate::services::chat::ChatService;
use crate::services::providers::gemini::{GeminiChatProvider, GeminiConfig};
use crate::services::providers::ChatProvider;
use crate::services::session_store::{InMemorySessionStore, SessionStore};
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/contact", post(contact))
        .route("/health", get(health_check))
        .route_service("/", ServeFile::new(static_dir.join("html/index.html")))
        .route_service(
            "/sitemap.xml",
            ServeFile::new(static_dir.join("public/sitemap.xml")),
        )
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/js", ServeDir::new(static_dir.join("js")))
        .nest_service("/assets", ServeDir::new(static_dir.join("assets")))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %uuid::Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: SiteConfig) -> Result<Self, AppError> {
        let provider: Arc<dyn ChatProvider> = Arc::new(GeminiChatProvider::new(GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: config.chat.model.clone(),
        }));

        tracing::info!(
            model = %config.chat.model,
            "Initialized Gemini chat provider"
        );

        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let chat = Arc::new(ChatService::new(
            provider,
            store,
            config.chat.fallback_session.clone(),
            Duration::from_secs(config.chat.timeout_secs),
        ));

        let router = build_router(AppState { chat }, Path::new(&config.static_dir));

        // Bind listener (port 0 = random port for testing)
        let address = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Site server listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
