//! Inbound wire event handlers
//!
//! Routes parsed client events to their handlers according to the session
//! state machine: anything before auth is ignored, malformed frames are
//! dropped, and only a failed auth handshake closes the connection.

mod auth;
mod error;
mod typing;

pub use auth::AuthHandler;
pub use error::{HandlerError, HandlerResult};
pub use typing::TypingHandler;

use crate::connection::Connection;
use crate::server::GatewayContext;
use confab_core::ClientEvent;
use std::sync::Arc;

/// Routes inbound client events to their handlers
pub struct EventRouter;

impl EventRouter {
    /// Handle one text frame from the client
    ///
    /// Returns `true` if the connection should be closed.
    pub async fn dispatch(ctx: &GatewayContext, connection: &Arc<Connection>, text: &str) -> bool {
        let event = match ClientEvent::from_json(text) {
            Ok(event) => event,
            Err(e) => {
                // Malformed or unknown-type frame: drop it, stay open
                tracing::debug!(
                    session_id = %connection.session_id(),
                    error = %e,
                    "Dropping unparseable frame"
                );
                return false;
            }
        };

        match event {
            ClientEvent::Auth { token } => {
                match AuthHandler::handle(ctx, connection, &token).await {
                    Ok(()) => false,
                    Err(e) => {
                        tracing::warn!(
                            session_id = %connection.session_id(),
                            error = %e,
                            "Auth handshake failed, closing connection"
                        );
                        true
                    }
                }
            }
            ClientEvent::Typing {
                conversation_id,
                is_typing,
            } => {
                if !connection.is_authenticated().await {
                    // No identity to attribute the event to
                    tracing::debug!(
                        session_id = %connection.session_id(),
                        "Ignoring typing event before auth"
                    );
                    return false;
                }

                if let Err(e) =
                    TypingHandler::handle(ctx, connection, conversation_id, is_typing).await
                {
                    // Storage failure: the relay for this event is abandoned
                    tracing::warn!(
                        session_id = %connection.session_id(),
                        conversation_id = %conversation_id,
                        error = %e,
                        "Typing relay abandoned"
                    );
                }
                false
            }
        }
    }
}
