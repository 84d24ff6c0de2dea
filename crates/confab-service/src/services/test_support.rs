//! In-memory fakes shared by the service tests

use async_trait::async_trait;
use confab_common::JwtService;
use confab_core::{
    Conversation, ConversationRepository, HistoryQuery, Message, MessageRepository, RepoResult,
    ServerEvent, User, UserRepository,
};
use confab_gateway::{Connection, ConnectionRegistry, Dispatcher};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::context::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<HashMap<Uuid, (User, String)>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.rows.lock().unwrap().get(&id).map(|(user, _)| user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|(user, _)| user.username == username)
            .map(|(user, _)| user.clone()))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>> {
        Ok(self.rows.lock().unwrap().get(&id).map(|(_, hash)| hash.clone()))
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
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn participant_ids(&self, conversation_id: Uuid) -> RepoResult<Vec<Uuid>> {
        Ok(self
            .participants
            .lock()
            .unwrap()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Conversation>> {
        let participants = self.participants.lock().unwrap();
        let rows = self.rows.lock().unwrap();
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
        let participants = self.participants.lock().unwrap();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|conversation| {
                conversation.is_direct()
                    && participants.get(&conversation.id).is_some_and(|ids| {
                        ids.contains(&user_a) && ids.contains(&user_b)
                    })
            })
            .cloned())
    }

    async fn create(
        &self,
        conversation: &Conversation,
        participant_ids: &[Uuid],
    ) -> RepoResult<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(conversation.id, conversation.clone());
        self.participants
            .lock()
            .unwrap()
            .insert(conversation.id, participant_ids.to_vec());
        Ok(())
    }
}

/// Messages kept in insertion order, mirroring the per-conversation
/// ordering the SQL implementation provides
#[derive(Default)]
pub struct MemoryMessages {
    rows: Mutex<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for MemoryMessages {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        Ok(self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.rows.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: Uuid,
        query: HistoryQuery,
    ) -> RepoResult<Vec<Message>> {
        let rows = self.rows.lock().unwrap();
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

/// Build a service context over fresh fakes, returning the registry so
/// tests can attach live connections
pub fn context() -> (ServiceContext, Arc<ConnectionRegistry>) {
    let registry = ConnectionRegistry::new_shared();
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry)));

    let ctx = ServiceContextBuilder::new()
        .users(Arc::new(MemoryUsers::default()))
        .conversations(Arc::new(MemoryConversations::default()))
        .messages(Arc::new(MemoryMessages::default()))
        .jwt(Arc::new(JwtService::new("service-test-secret", 900)))
        .dispatcher(dispatcher)
        .build()
        .expect("all context dependencies provided");

    (ctx, registry)
}

/// Seed a user directly through the repository
pub async fn seed_user(ctx: &ServiceContext, username: &str) -> Uuid {
    let user = User::new(Uuid::new_v4(), username.to_string());
    ctx.users().create(&user, "seeded-hash").await.unwrap();
    user.id
}

/// Seed a group conversation directly through the repository
pub async fn seed_conversation(ctx: &ServiceContext, participant_ids: &[Uuid]) -> Uuid {
    let conversation = Conversation::new_group(Uuid::new_v4(), None);
    ctx.conversations()
        .create(&conversation, participant_ids)
        .await
        .unwrap();
    conversation.id
}

/// Register a live connection for a user, returning its outbound queue
pub fn subscribe(
    registry: &Arc<ConnectionRegistry>,
    user_id: Uuid,
) -> mpsc::Receiver<ServerEvent> {
    let (tx, rx) = mpsc::channel(16);
    let connection = Connection::new(format!("session-{user_id}"), tx);
    registry.register(user_id, connection);
    rx
}
