//! Conversation proxy: turns a raw visitor message into a model reply,
//! handling session continuity and system priming.

use crate::error::ChatError;
use crate::models::conversation::Conversation;
use crate::services::providers::ChatProvider;
use crate::services::session_store::SessionStore;
use std::sync::Arc;
use std::time::Duration;

/// Maximum characters of the inbound message echoed into logs.
const LOG_PREVIEW_CHARS: usize = 80;

pub struct ChatService {
    provider: Arc<dyn ChatProvider>,
    store: Arc<dyn SessionStore>,
    /// Session id substituted for anonymous callers; all of them share one
    /// conversation.
    fallback_session: String,
    /// Deadline on the provider call; expiry maps to `ModelUnavailable`.
    request_timeout: Duration,
}

impl ChatService {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        store: Arc<dyn SessionStore>,
        fallback_session: String,
        request_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            store,
            fallback_session,
            request_timeout,
        }
    }

    /// Handle one chat message: validate, resolve the session, forward to the
    /// model, record the exchange, return the raw reply text.
    pub async fn handle(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let session_id = match session_id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => self.fallback_session.as_str(),
        };

        tracing::info!(
            session_id = %session_id,
            preview = %preview(message),
            "Chat message received"
        );

        let handle = self
            .store
            .get_or_create(session_id, Conversation::seeded());

        // Held across the provider call: requests on one session are
        // serialized and the history cannot interleave.
        let mut conversation = handle.lock().await;

        let reply = match tokio::time::timeout(
            self.request_timeout,
            self.provider.send(&conversation, message),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    session_id = %session_id,
                    timeout_secs = self.request_timeout.as_secs(),
                    "Provider call timed out"
                );
                return Err(ChatError::ModelUnavailable {
                    details: format!(
                        "provider call exceeded {}s deadline",
                        self.request_timeout.as_secs()
                    ),
                });
            }
        };

        // History only grows on success; a failed call leaves the
        // conversation as it was.
        conversation.push_exchange(message, &reply);

        Ok(reply)
    }
}

fn preview(message: &str) -> String {
    let mut preview: String = message.chars().take(LOG_PREVIEW_CHARS).collect();
    if message.chars().count() > LOG_PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::SYSTEM_INSTRUCTION;
    use crate::services::providers::mock::MockChatProvider;
    use crate::services::providers::ProviderError;
    use crate::services::session_store::InMemorySessionStore;
    use async_trait::async_trait;

    fn service(provider: Arc<MockChatProvider>) -> (ChatService, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new());
        let service = ChatService::new(
            provider,
            store.clone(),
            "default".to_string(),
            Duration::from_secs(5),
        );
        (service, store)
    }

    #[tokio::test]
    async fn empty_message_fails_without_provider_call() {
        let provider = Arc::new(MockChatProvider::echoing());
        let (service, store) = service(provider.clone());

        let result = service.handle("", None).await;

        assert!(matches!(result, Err(ChatError::EmptyMessage)));
        assert_eq!(provider.call_count(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn whitespace_message_fails_without_provider_call() {
        let provider = Arc::new(MockChatProvider::echoing());
        let (service, _store) = service(provider.clone());

        let result = service.handle("   \n\t ", Some("abc")).await;

        assert!(matches!(result, Err(ChatError::EmptyMessage)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn first_call_seeds_conversation_before_forwarding() {
        let provider = Arc::new(MockChatProvider::echoing());
        let (service, _store) = service(provider.clone());

        service
            .handle("¿Hacéis tiendas online?", Some("abc"))
            .await
            .expect("handled");

        let seen = provider.seen().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system_instruction, SYSTEM_INSTRUCTION);
        // Seed exchange only; the visitor turn is forwarded alongside.
        assert_eq!(seen[0].history_len, 2);
        assert_eq!(seen[0].message, "¿Hacéis tiendas online?");
    }

    #[tokio::test]
    async fn successful_exchange_is_recorded() {
        let provider = Arc::new(MockChatProvider::echoing());
        let (service, store) = service(provider);

        service.handle("Hola", Some("abc")).await.expect("handled");

        let handle = store.get("abc").expect("session exists");
        assert_eq!(handle.lock().await.turns.len(), 4);
    }

    #[tokio::test]
    async fn failed_call_leaves_history_untouched() {
        let provider = Arc::new(MockChatProvider::new(vec![Err(ProviderError::RateLimited)]));
        let (service, store) = service(provider);

        let result = service.handle("Hola", Some("abc")).await;

        assert!(matches!(result, Err(ChatError::RateLimited { .. })));
        let handle = store.get("abc").expect("session exists");
        assert_eq!(handle.lock().await.turns.len(), 2);
    }

    #[tokio::test]
    async fn sequential_requests_share_one_conversation() {
        let provider = Arc::new(MockChatProvider::echoing());
        let (service, store) = service(provider.clone());

        service
            .handle("Me llamo Marta", Some("abc"))
            .await
            .expect("handled");
        let first_handle = store.get("abc").expect("session exists");

        service
            .handle("¿Recuerdas mi nombre?", Some("abc"))
            .await
            .expect("handled");
        let second_handle = store.get("abc").expect("session exists");

        assert!(Arc::ptr_eq(&first_handle, &second_handle));
        let seen = provider.seen().await;
        assert_eq!(seen[0].history_len, 2);
        assert_eq!(seen[1].history_len, 4);
    }

    #[tokio::test]
    async fn anonymous_callers_share_the_fallback_session() {
        let provider = Arc::new(MockChatProvider::echoing());
        let (service, store) = service(provider.clone());

        service.handle("Hola", None).await.expect("handled");
        service.handle("¿Sigues ahí?", Some("  ")).await.expect("handled");

        assert_eq!(store.len(), 1);
        assert!(store.get("default").is_some());
        let seen = provider.seen().await;
        assert_eq!(seen[1].history_len, 4);
    }

    struct StalledProvider;

    #[async_trait]
    impl ChatProvider for StalledProvider {
        async fn send(
            &self,
            _conversation: &Conversation,
            _message: &str,
        ) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("late".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_provider_times_out_as_unavailable() {
        let store = Arc::new(InMemorySessionStore::new());
        let service = ChatService::new(
            Arc::new(StalledProvider),
            store,
            "default".to_string(),
            Duration::from_secs(30),
        );

        let result = service.handle("Hola", Some("abc")).await;

        assert!(matches!(result, Err(ChatError::ModelUnavailable { .. })));
    }
}
