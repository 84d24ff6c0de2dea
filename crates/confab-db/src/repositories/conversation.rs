//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use confab_core::{Conversation, ConversationRepository, RepoResult};

use crate::models::conversation::kind_as_str;
use crate::models::ConversationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT id, kind, title, created_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn participant_ids(&self, conversation_id: Uuid) -> RepoResult<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT user_id
            FROM conversation_participants
            WHERE conversation_id = $1
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    #[instrument(skip(self))]
    async fn find_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Conversation>> {
        let results = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT c.id, c.kind, c.title, c.created_at
            FROM conversations c
            JOIN conversation_participants p ON p.conversation_id = c.id
            WHERE p.user_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Conversation::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_direct(&self, user_a: Uuid, user_b: Uuid) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT c.id, c.kind, c.title, c.created_at
            FROM conversations c
            JOIN conversation_participants pa ON pa.conversation_id = c.id AND pa.user_id = $1
            JOIN conversation_participants pb ON pb.conversation_id = c.id AND pb.user_id = $2
            WHERE c.kind = 'direct'
            LIMIT 1
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self, participant_ids))]
    async fn create(
        &self,
        conversation: &Conversation,
        participant_ids: &[Uuid],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO conversations (id, kind, title, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(conversation.id)
        .bind(kind_as_str(conversation.kind))
        .bind(&conversation.title)
        .bind(conversation.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id)
            SELECT $1, user_id FROM UNNEST($2::uuid[]) AS t(user_id)
            "#,
        )
        .bind(conversation.id)
        .bind(participant_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
