//! Conversation entity - a direct or group chat between users

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Kind of conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    /// Exactly two participants; deduplicated per user pair
    Direct,
    /// Any number of participants, optionally titled
    Group,
}

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: Uuid,
    pub kind: ConversationKind,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new direct conversation
    pub fn new_direct(id: Uuid) -> Self {
        Self {
            id,
            kind: ConversationKind::Direct,
            title: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new group conversation
    pub fn new_group(id: Uuid, title: Option<String>) -> Self {
        Self {
            id,
            kind: ConversationKind::Group,
            title,
            created_at: Utc::now(),
        }
    }

    /// Check if this is a direct (two-party) conversation
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.kind == ConversationKind::Direct
    }
}

/// Membership of a user in a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new Participant joining now
    pub fn new(conversation_id: Uuid, user_id: Uuid) -> Self {
        Self {
            conversation_id,
            user_id,
            joined_at: Utc::now(),
        }
    }
}
