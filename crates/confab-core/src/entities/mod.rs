//! Domain entities

mod conversation;
mod message;
mod user;

pub use conversation::{Conversation, ConversationKind, Participant};
pub use message::Message;
pub use user::User;
