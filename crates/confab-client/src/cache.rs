//! Local message cache
//!
//! Messages arrive both through the live push and through REST history
//! fetches with no ordering guarantee between the two, so every insertion
//! is deduplicated by message id and each conversation is kept in
//! chronological order.

use confab_core::MessageRecord;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-conversation message store with id-deduplicated merges
#[derive(Default)]
pub struct MessageCache {
    conversations: Mutex<HashMap<Uuid, Vec<MessageRecord>>>,
}

impl MessageCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one record; returns `false` if a message with the same id is
    /// already cached
    pub fn merge(&self, record: MessageRecord) -> bool {
        let mut conversations = self.conversations.lock();
        let messages = conversations.entry(record.conversation_id).or_default();

        if messages.iter().any(|m| m.id == record.id) {
            return false;
        }

        messages.push(record);
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        true
    }

    /// Merge a history page, returning how many records were new
    pub fn merge_history(&self, records: impl IntoIterator<Item = MessageRecord>) -> usize {
        records
            .into_iter()
            .filter(|record| self.merge(record.clone()))
            .count()
    }

    /// Snapshot a conversation's cached messages in chronological order
    pub fn conversation(&self, conversation_id: Uuid) -> Vec<MessageRecord> {
        self.conversations
            .lock()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of cached messages for a conversation
    pub fn len(&self, conversation_id: Uuid) -> usize {
        self.conversations
            .lock()
            .get(&conversation_id)
            .map_or(0, Vec::len)
    }
}
