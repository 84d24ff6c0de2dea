//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL in production, in-memory fakes
//! in tests).

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Conversation, Message, User};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Create a new user with a password hash
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find conversation by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>>;

    /// Get the participant user ids of a conversation
    ///
    /// Read fresh on every call; the live-delivery path never caches this.
    async fn participant_ids(&self, conversation_id: Uuid) -> RepoResult<Vec<Uuid>>;

    /// List all conversations a user participates in
    async fn find_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Conversation>>;

    /// Find the direct conversation between two users, if one exists
    async fn find_direct(&self, user_a: Uuid, user_b: Uuid) -> RepoResult<Option<Conversation>>;

    /// Create a conversation together with its participant rows
    async fn create(
        &self,
        conversation: &Conversation,
        participant_ids: &[Uuid],
    ) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Pagination options for history queries
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    /// Only return messages created before this message id
    pub before: Option<Uuid>,
    /// Maximum number of messages to return
    pub limit: i64,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            before: None,
            limit: 50,
        }
    }
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>>;

    /// Persist a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Fetch a page of a conversation's history in chronological order
    ///
    /// The returned page is ordered oldest-first; the newest page is
    /// returned when no cursor is given.
    async fn find_by_conversation(
        &self,
        conversation_id: Uuid,
        query: HistoryQuery,
    ) -> RepoResult<Vec<Message>>;
}
