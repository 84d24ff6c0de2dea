//! Conversation row model

use chrono::{DateTime, Utc};
use confab_core::{Conversation, ConversationKind};
use uuid::Uuid;

/// Row of the `conversations` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationModel {
    pub id: Uuid,
    pub kind: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        let kind = match model.kind.as_str() {
            "direct" => ConversationKind::Direct,
            _ => ConversationKind::Group,
        };

        Self {
            id: model.id,
            kind,
            title: model.title,
            created_at: model.created_at,
        }
    }
}

/// The string stored in the `kind` column
pub(crate) fn kind_as_str(kind: ConversationKind) -> &'static str {
    match kind {
        ConversationKind::Direct => "direct",
        ConversationKind::Group => "group",
    }
}
