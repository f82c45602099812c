pub mod conversation;

pub use conversation::{ChatTurn, Conversation, Role};
