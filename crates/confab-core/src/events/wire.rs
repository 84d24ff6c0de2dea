//! Wire protocol for the live transport
//!
//! All frames are JSON text, internally tagged on `type`. Field names use
//! camelCase to match the browser client. Unknown `type` values fail to
//! parse and are dropped by the receiver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Message, User};

/// Events a client may send to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Bind the connection's identity with a signed access token.
    ///
    /// The token is the same short-lived JWT the REST API accepts; the
    /// server validates it rather than trusting a client-claimed user id.
    Auth { token: String },

    /// Announce that the sender started or stopped typing
    #[serde(rename_all = "camelCase")]
    Typing {
        conversation_id: Uuid,
        is_typing: bool,
    },
}

/// Events the server pushes to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message was persisted in a conversation the recipient belongs to
    #[serde(rename_all = "camelCase")]
    NewMessage {
        conversation_id: Uuid,
        message: MessageRecord,
    },

    /// A participant started or stopped typing
    #[serde(rename_all = "camelCase")]
    Typing {
        conversation_id: Uuid,
        user_id: Uuid,
        is_typing: bool,
    },
}

impl ServerEvent {
    /// Get the wire event type name
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::NewMessage { .. } => "new_message",
            Self::Typing { .. } => "typing",
        }
    }

    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON text frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ClientEvent {
    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON text frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A persisted message as carried on the wire and in REST responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender: SenderProfile,
}

impl MessageRecord {
    /// Assemble a record from a persisted message and its sender
    pub fn from_message(message: &Message, sender: &User) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            created_at: message.created_at,
            sender: SenderProfile::from(sender),
        }
    }
}

/// The sender profile embedded in every pushed message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<&User> for SenderProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}
