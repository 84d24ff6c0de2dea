//! Auth handshake handler
//!
//! Binds a connection's identity by validating the same signed access token
//! the REST API issues. The transport never trusts a client-claimed user id.

use super::{HandlerError, HandlerResult};
use crate::connection::{Connection, SessionState};
use crate::server::GatewayContext;
use std::sync::Arc;

/// Handles `auth` events
pub struct AuthHandler;

impl AuthHandler {
    /// Validate the token, bind the identity, and register the connection
    ///
    /// A repeated `auth` from a well-behaved client simply re-registers
    /// (idempotent); a token for a different user rebinds after releasing
    /// the previous registration.
    pub async fn handle(
        ctx: &GatewayContext,
        connection: &Arc<Connection>,
        token: &str,
    ) -> HandlerResult<()> {
        let claims = ctx
            .jwt()
            .validate(token)
            .map_err(|e| HandlerError::AuthenticationFailed(e.to_string()))?;

        let user_id = claims
            .user_id()
            .map_err(|e| HandlerError::AuthenticationFailed(e.to_string()))?;

        if let Some(previous) = connection.user_id().await {
            if previous != user_id {
                ctx.registry().unregister(previous, connection);
            }
        }

        connection.bind_identity(user_id).await;
        connection.set_state(SessionState::Authenticated).await;
        ctx.registry().register(user_id, Arc::clone(connection));

        tracing::info!(
            session_id = %connection.session_id(),
            user_id = %user_id,
            "Connection authenticated"
        );

        Ok(())
    }
}
