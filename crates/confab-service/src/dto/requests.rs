//! Request DTOs with validation rules

use confab_core::ConversationKind;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Register a new account
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 64))]
    pub display_name: Option<String>,
}

/// Log in with username and password
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Create a direct or group conversation
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub kind: ConversationKind,

    /// The other participants; the caller is always included
    #[validate(length(min = 1, max = 100))]
    pub participant_ids: Vec<Uuid>,

    #[validate(length(min = 1, max = 80))]
    pub title: Option<String>,
}

/// Send a message into a conversation
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}
