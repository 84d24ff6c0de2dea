//! In-memory repository fakes
//!
//! Behave like the PostgreSQL implementations for the paths the tests
//! exercise: per-conversation insertion order, empty participant lists for
//! unknown conversations, and username uniqueness.

use async_trait::async_trait;
use confab_core::{
    Conversation, ConversationRepository, DomainError, HistoryQuery, Message, MessageRepository,
    RepoResult, User, UserRepository,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<HashMap<Uuid, (User, String)>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.rows.lock().get(&id).map(|(user, _)| user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .values()
            .find(|(user, _)| user.username == username)
            .map(|(user, _)| user.clone()))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        if rows.values().any(|(u, _)| u.username == user.username) {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        rows.insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>> {
        Ok(self.rows.lock().get(&id).map(|(_, hash)| hash.clone()))
    }
}

#[derive(Default)]
pub struct MemoryConversations {
    rows: Mutex<HashMap<Uuid, Conversation>>,
    participants: Mutex<HashMap<Uuid, Vec<Uuid>>>,
}

#[async_trait]
impl ConversationRepository for MemoryConversations {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>> {
        Ok(self.rows.lock().get(&id).cloned())
    }

    async fn participant_ids(&self, conversation_id: Uuid) -> RepoResult<Vec<Uuid>> {
        Ok(self
            .participants
            .lock()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Conversation>> {
        let participants = self.participants.lock();
        let rows = self.rows.lock();
        Ok(rows
            .values()
            .filter(|conversation| {
                participants
                    .get(&conversation.id)
                    .is_some_and(|ids| ids.contains(&user_id))
            })
            .cloned()
            .collect())
    }

    async fn find_direct(&self, user_a: Uuid, user_b: Uuid) -> RepoResult<Option<Conversation>> {
        let participants = self.participants.lock();
        let rows = self.rows.lock();
        Ok(rows
            .values()
            .find(|conversation| {
                conversation.is_direct()
                    && participants
                        .get(&conversation.id)
                        .is_some_and(|ids| ids.contains(&user_a) && ids.contains(&user_b))
            })
            .cloned())
    }

    async fn create(
        &self,
        conversation: &Conversation,
        participant_ids: &[Uuid],
    ) -> RepoResult<()> {
        self.rows.lock().insert(conversation.id, conversation.clone());
        self.participants
            .lock()
            .insert(conversation.id, participant_ids.to_vec());
        Ok(())
    }
}

/// Messages kept in insertion order, matching the SQL ordering contract
#[derive(Default)]
pub struct MemoryMessages {
    rows: Mutex<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for MemoryMessages {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        Ok(self.rows.lock().iter().find(|m| m.id == id).cloned())
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.rows.lock().push(message.clone());
        Ok(())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: Uuid,
        query: HistoryQuery,
    ) -> RepoResult<Vec<Message>> {
        let rows = self.rows.lock();
        let mut messages: Vec<Message> = rows
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();

        if let Some(before) = query.before {
            match messages.iter().position(|m| m.id == before) {
                Some(pos) => messages.truncate(pos),
                None => messages.clear(),
            }
        }

        let limit = query.limit.clamp(1, 100) as usize;
        if messages.len() > limit {
            messages = messages.split_off(messages.len() - limit);
        }

        Ok(messages)
    }
}
