//! User entity - an account that can participate in conversations

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User
    pub fn new(id: Uuid, username: String) -> Self {
        Self {
            id,
            username,
            display_name: None,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new User with a display name
    pub fn with_display_name(id: Uuid, username: String, display_name: String) -> Self {
        Self {
            display_name: Some(display_name),
            ..Self::new(id, username)
        }
    }

    /// The name shown in conversation lists (display name, falling back to username)
    pub fn visible_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}
