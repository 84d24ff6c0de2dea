//! Conversation service
//!
//! Creates and lists conversations. Direct conversations deduplicate to the
//! existing pair conversation instead of creating a second one.

use confab_core::{Conversation, ConversationKind, User};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{ConversationResponse, CreateConversationRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a conversation on behalf of `creator_id`
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        creator_id: Uuid,
        request: CreateConversationRequest,
    ) -> ServiceResult<ConversationResponse> {
        let mut participant_ids = request.participant_ids;
        participant_ids.push(creator_id);
        participant_ids.sort_unstable();
        participant_ids.dedup();

        for &user_id in &participant_ids {
            if self.ctx.users().find_by_id(user_id).await?.is_none() {
                return Err(ServiceError::not_found("User", user_id));
            }
        }

        let conversation = match request.kind {
            ConversationKind::Direct => {
                if participant_ids.len() != 2 {
                    return Err(ServiceError::validation(
                        "a direct conversation has exactly one other participant",
                    ));
                }

                let other = participant_ids
                    .iter()
                    .copied()
                    .find(|&id| id != creator_id)
                    .ok_or_else(|| {
                        ServiceError::validation("cannot open a direct conversation with yourself")
                    })?;

                if let Some(existing) =
                    self.ctx.conversations().find_direct(creator_id, other).await?
                {
                    return self.resolve(existing).await;
                }

                let conversation = Conversation::new_direct(Uuid::new_v4());
                self.ctx
                    .conversations()
                    .create(&conversation, &participant_ids)
                    .await?;
                conversation
            }
            ConversationKind::Group => {
                if participant_ids.len() < 2 {
                    return Err(ServiceError::validation(
                        "a group conversation needs at least one other participant",
                    ));
                }

                let conversation = Conversation::new_group(Uuid::new_v4(), request.title);
                self.ctx
                    .conversations()
                    .create(&conversation, &participant_ids)
                    .await?;
                conversation
            }
        };

        info!(
            conversation_id = %conversation.id,
            kind = ?conversation.kind,
            participants = participant_ids.len(),
            "Conversation created"
        );

        self.resolve(conversation).await
    }

    /// List the caller's conversations
    pub async fn list_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<ConversationResponse>> {
        let conversations = self.ctx.conversations().find_for_user(user_id).await?;

        let mut responses = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            responses.push(self.resolve(conversation).await?);
        }

        Ok(responses)
    }

    /// Fetch one conversation, verifying the caller belongs to it
    pub async fn get(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<ConversationResponse> {
        let conversation = self
            .ctx
            .conversations()
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation", conversation_id))?;

        let participant_ids = self
            .ctx
            .conversations()
            .participant_ids(conversation_id)
            .await?;

        if !participant_ids.contains(&user_id) {
            return Err(ServiceError::not_found("Conversation", conversation_id));
        }

        self.resolve(conversation).await
    }

    /// Attach resolved participant profiles to a conversation
    async fn resolve(&self, conversation: Conversation) -> ServiceResult<ConversationResponse> {
        let participant_ids = self
            .ctx
            .conversations()
            .participant_ids(conversation.id)
            .await?;

        let mut participants: Vec<User> = Vec::with_capacity(participant_ids.len());
        for user_id in participant_ids {
            if let Some(user) = self.ctx.users().find_by_id(user_id).await? {
                participants.push(user);
            }
        }

        Ok(ConversationResponse::new(conversation, participants))
    }
}
