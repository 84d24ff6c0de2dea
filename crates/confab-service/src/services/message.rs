//! Message service
//!
//! Persists messages and pushes them to online participants. REST is the
//! durable source of truth: the push is a latency optimization and its
//! failure never fails the request.

use std::collections::HashMap;

use confab_core::{HistoryQuery, Message, MessageRecord, ServerEvent, User};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::dto::SendMessageRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist a message, then push it to every online participant except
    /// the sender
    ///
    /// Pushes are issued synchronously, one per completed persistence, so a
    /// recipient sees a conversation's messages in insertion order.
    #[instrument(skip(self, request))]
    pub async fn send_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageRecord> {
        self.ctx
            .conversations()
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation", conversation_id))?;

        let participants = self
            .ctx
            .conversations()
            .participant_ids(conversation_id)
            .await?;

        if !participants.contains(&sender_id) {
            return Err(ServiceError::permission_denied(
                "sender is not a participant of this conversation",
            ));
        }

        let message = Message::new(Uuid::new_v4(), conversation_id, sender_id, request.content);
        if message.is_empty() {
            return Err(ServiceError::validation("message content must not be blank"));
        }

        self.ctx.messages().create(&message).await?;

        let sender = self
            .ctx
            .users()
            .find_by_id(sender_id)
            .await?
            .ok_or_else(|| ServiceError::internal("message sender missing from storage"))?;

        let record = MessageRecord::from_message(&message, &sender);

        info!(
            message_id = %message.id,
            conversation_id = %conversation_id,
            preview = message.preview(32),
            "Message created"
        );

        // Best-effort push to the live participants; offline ones catch up
        // through the history endpoint.
        let event = ServerEvent::NewMessage {
            conversation_id,
            message: record.clone(),
        };
        let delivered = self
            .ctx
            .dispatcher()
            .broadcast(&participants, &event, Some(sender_id));

        debug!(
            message_id = %message.id,
            delivered = delivered,
            "Message pushed to online participants"
        );

        Ok(record)
    }

    /// Fetch a page of a conversation's history in chronological order
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        query: HistoryQuery,
    ) -> ServiceResult<Vec<MessageRecord>> {
        self.ctx
            .conversations()
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation", conversation_id))?;

        let participants = self
            .ctx
            .conversations()
            .participant_ids(conversation_id)
            .await?;

        if !participants.contains(&user_id) {
            return Err(ServiceError::not_found("Conversation", conversation_id));
        }

        let messages = self
            .ctx
            .messages()
            .find_by_conversation(conversation_id, query)
            .await?;

        let mut senders: HashMap<Uuid, User> = HashMap::new();
        for message in &messages {
            if !senders.contains_key(&message.sender_id) {
                let sender = self
                    .ctx
                    .users()
                    .find_by_id(message.sender_id)
                    .await?
                    .ok_or_else(|| ServiceError::internal("message sender missing from storage"))?;
                senders.insert(message.sender_id, sender);
            }
        }

        Ok(messages
            .iter()
            .map(|message| MessageRecord::from_message(message, &senders[&message.sender_id]))
            .collect())
    }
}
