//! Message entity - a persisted chat message

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new Message timestamped now
    pub fn new(id: Uuid, conversation_id: Uuid, sender_id: Uuid, content: String) -> Self {
        Self {
            id,
            conversation_id,
            sender_id,
            content,
            created_at: Utc::now(),
        }
    }

    /// Check if message content is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Get a truncated preview of the message (for log lines and notifications)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}
