//! Gateway context
//!
//! Shared dependencies for the live transport endpoint.

use crate::broadcast::Dispatcher;
use crate::connection::ConnectionRegistry;
use confab_common::JwtService;
use confab_core::ConversationRepository;
use std::sync::Arc;

/// Shared state for the live transport endpoint
#[derive(Clone)]
pub struct GatewayContext {
    /// Registry of live, authenticated connections
    registry: Arc<ConnectionRegistry>,
    /// Broadcast dispatcher over the registry
    dispatcher: Arc<Dispatcher>,
    /// Read-only access to conversation membership
    conversations: Arc<dyn ConversationRepository>,
    /// Token validation for the auth handshake
    jwt: Arc<JwtService>,
    /// Per-connection outbound queue depth
    outbound_buffer: usize,
}

impl GatewayContext {
    /// Create a new gateway context
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        conversations: Arc<dyn ConversationRepository>,
        jwt: Arc<JwtService>,
        outbound_buffer: usize,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry)));
        Self {
            registry,
            dispatcher,
            conversations,
            jwt,
            outbound_buffer,
        }
    }

    /// Get the connection registry
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Get the broadcast dispatcher
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Get the conversation repository
    pub fn conversations(&self) -> &Arc<dyn ConversationRepository> {
        &self.conversations
    }

    /// Get the JWT service
    pub fn jwt(&self) -> &Arc<JwtService> {
        &self.jwt
    }

    /// Per-connection outbound queue depth
    pub fn outbound_buffer(&self) -> usize {
        self.outbound_buffer
    }
}

impl std::fmt::Debug for GatewayContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayContext")
            .field("registry", &self.registry)
            .field("outbound_buffer", &self.outbound_buffer)
            .finish()
    }
}
