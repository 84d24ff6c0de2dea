//! Response DTOs
//!
//! Message payloads reuse `confab_core::MessageRecord` so the REST body and
//! the live push carry the identical record shape.

use chrono::{DateTime, Utc};
use confab_core::{Conversation, ConversationKind, User};
use serde::Serialize;
use uuid::Uuid;

/// Public profile of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

/// Successful register/login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// A conversation together with its participants
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: Uuid,
    pub kind: ConversationKind,
    pub title: Option<String>,
    pub participants: Vec<UserResponse>,
    pub created_at: DateTime<Utc>,
}

impl ConversationResponse {
    /// Assemble from a conversation and its resolved participants
    pub fn new(conversation: Conversation, participants: Vec<User>) -> Self {
        Self {
            id: conversation.id,
            kind: conversation.kind,
            title: conversation.title,
            participants: participants.into_iter().map(UserResponse::from).collect(),
            created_at: conversation.created_at,
        }
    }
}
