//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use confab_core::{HistoryQuery, Message, MessageRepository, RepoResult};

use crate::models::MessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, conversation_id, sender_id, content, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_conversation(
        &self,
        conversation_id: Uuid,
        query: HistoryQuery,
    ) -> RepoResult<Vec<Message>> {
        let limit = query.limit.clamp(1, 100);

        // Pages are selected newest-first, then flipped so each page reads
        // chronologically (insertion order per conversation).
        let results = match query.before {
            Some(before) => {
                sqlx::query_as::<_, MessageModel>(
                    r#"
                    SELECT id, conversation_id, sender_id, content, created_at
                    FROM (
                        SELECT m.id, m.conversation_id, m.sender_id, m.content, m.created_at
                        FROM messages m, messages cursor
                        WHERE cursor.id = $2
                          AND m.conversation_id = $1
                          AND (m.created_at, m.id) < (cursor.created_at, cursor.id)
                        ORDER BY m.created_at DESC, m.id DESC
                        LIMIT $3
                    ) page
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .bind(conversation_id)
                .bind(before)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MessageModel>(
                    r#"
                    SELECT id, conversation_id, sender_id, content, created_at
                    FROM (
                        SELECT id, conversation_id, sender_id, content, created_at
                        FROM messages
                        WHERE conversation_id = $1
                        ORDER BY created_at DESC, id DESC
                        LIMIT $2
                    ) page
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .bind(conversation_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }
}
