//! Session store: conversation-handle continuity per visitor session.
//!
//! In-memory bookkeeping only; nothing survives a restart. The store is the
//! sole owner of the map, handles are shared only with the chat service.

use crate::models::conversation::Conversation;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to one conversation. The inner mutex serializes requests
/// that target the same session.
pub type SessionHandle = Arc<Mutex<Conversation>>;

/// Store abstraction, injected at the composition root so tests can swap in
/// doubles and a bounded implementation can slot in later.
pub trait SessionStore: Send + Sync {
    /// Pure lookup, no side effect.
    fn get(&self, session_id: &str) -> Option<SessionHandle>;

    /// Return the existing handle for `session_id`, or install `seed` under
    /// it and return the new handle. Implementations must make this atomic:
    /// concurrent first requests for one session converge on a single handle.
    fn get_or_create(&self, session_id: &str, seed: Conversation) -> SessionHandle;
}

/// Process-wide map of session id to conversation handle. Unbounded: every
/// session ever seen is retained until process restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    fn get_or_create(&self, session_id: &str, seed: Conversation) -> SessionHandle {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(seed)))
            .value()
            .clone()
    }
}
