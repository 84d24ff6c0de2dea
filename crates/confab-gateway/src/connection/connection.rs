//! Individual transport session
//!
//! Represents a single WebSocket connection and its lifecycle state. A
//! session is owned by its handler task; the registry and the dispatcher
//! only ever hold it behind `Arc` and interact through the methods here.

use confab_core::ServerEvent;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Notify, RwLock};
use uuid::Uuid;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket open, no identity bound yet
    Connecting,
    /// Identity bound and registered
    Authenticated,
    /// Terminal; the identity (if any) has been or is being deregistered
    Closed,
}

/// A single live transport session
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Authenticated user ID (None until the auth handshake completes)
    user_id: RwLock<Option<Uuid>>,

    /// Current lifecycle state
    state: RwLock<SessionState>,

    /// Outbound event queue drained by the socket's send task
    sender: mpsc::Sender<ServerEvent>,

    /// Signalled when the session must stop (e.g. displaced by a newer
    /// connection for the same user)
    shutdown: Notify,

    /// Session creation time
    opened_at: Instant,
}

impl Connection {
    /// Create a new session in the `Connecting` state
    pub fn new(session_id: String, sender: mpsc::Sender<ServerEvent>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            user_id: RwLock::new(None),
            state: RwLock::new(SessionState::Connecting),
            sender,
            shutdown: Notify::new(),
            opened_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the user ID (if authenticated)
    pub async fn user_id(&self) -> Option<Uuid> {
        *self.user_id.read().await
    }

    /// Bind the authenticated identity
    pub async fn bind_identity(&self, user_id: Uuid) {
        *self.user_id.write().await = Some(user_id);
    }

    /// Get the current state
    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Set the session state
    pub async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }

    /// Check if the session has a bound identity
    pub async fn is_authenticated(&self) -> bool {
        self.user_id.read().await.is_some()
    }

    /// Queue an event for delivery to this session
    ///
    /// Best-effort and non-blocking: a full queue or a torn-down socket
    /// counts as "recipient offline" and the event is discarded.
    pub fn send(&self, event: ServerEvent) -> Result<(), TrySendError<ServerEvent>> {
        self.sender.try_send(event)
    }

    /// Tell the session's handler task to stop
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Wait until the session has been told to stop
    pub async fn closed(&self) {
        self.shutdown.notified().await;
    }

    /// Check if the outbound queue has been torn down
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Get session age
    pub fn age(&self) -> std::time::Duration {
        self.opened_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("opened_at", &self.opened_at)
            .finish()
    }
}
