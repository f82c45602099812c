pub mod chat;
pub mod providers;
pub mod session_store;

pub use chat::ChatService;
pub use session_store::{InMemorySessionStore, SessionStore};
