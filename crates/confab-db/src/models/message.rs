//! Message row model

use chrono::{DateTime, Utc};
use confab_core::Message;
use uuid::Uuid;

/// Row of the `messages` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageModel {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Self {
            id: model.id,
            conversation_id: model.conversation_id,
            sender_id: model.sender_id,
            content: model.content,
            created_at: model.created_at,
        }
    }
}
