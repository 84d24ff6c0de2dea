//! Typing-indicator relay
//!
//! Ephemeral, non-persisted forwarding of typing state to the other online
//! participants of a conversation. The participant list is read fresh from
//! storage on every event (the staleness window is one lookup), and nothing
//! is retained between calls; consumers treat the indicator as advisory and
//! time it out locally.

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayContext;
use confab_core::ServerEvent;
use std::sync::Arc;
use uuid::Uuid;

/// Handles `typing` events from authenticated sessions
pub struct TypingHandler;

impl TypingHandler {
    /// Relay a typing indicator to the conversation's other participants
    pub async fn handle(
        ctx: &GatewayContext,
        connection: &Arc<Connection>,
        conversation_id: Uuid,
        is_typing: bool,
    ) -> HandlerResult<()> {
        let Some(user_id) = connection.user_id().await else {
            return Ok(());
        };

        // Uncached read; the dispatcher is not entered until this resolves,
        // so no registry access spans the storage wait.
        let participants = ctx.conversations().participant_ids(conversation_id).await?;

        if !participants.contains(&user_id) {
            tracing::debug!(
                session_id = %connection.session_id(),
                user_id = %user_id,
                conversation_id = %conversation_id,
                "Typing event for a conversation the sender does not belong to, dropped"
            );
            return Ok(());
        }

        let event = ServerEvent::Typing {
            conversation_id,
            user_id,
            is_typing,
        };

        let delivered = ctx.dispatcher().broadcast(&participants, &event, Some(user_id));

        tracing::trace!(
            conversation_id = %conversation_id,
            user_id = %user_id,
            is_typing = is_typing,
            delivered = delivered,
            "Typing indicator relayed"
        );

        Ok(())
    }
}
