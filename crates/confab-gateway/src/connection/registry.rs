//! Connection registry
//!
//! Maps each authenticated user to its single live transport session. This
//! is the one piece of shared mutable state in the system; `DashMap` guards
//! the map itself, and the replace-on-register / guarded-unregister pair
//! keeps "at most one live handle per user" true even when a dying old
//! connection races a newly authenticated one.

use super::Connection;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Registry of live, authenticated connections keyed by user id
pub struct ConnectionRegistry {
    connections: DashMap<Uuid, Arc<Connection>>,
}

impl ConnectionRegistry {
    /// Create a new connection registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a user's live connection, displacing any prior one
    ///
    /// The displaced session is told to shut down so its socket task exits
    /// and the client sees a close frame. Re-registering the same session
    /// is idempotent. Returns the displaced connection, if any.
    pub fn register(&self, user_id: Uuid, connection: Arc<Connection>) -> Option<Arc<Connection>> {
        let displaced = self.connections.insert(user_id, Arc::clone(&connection));

        match displaced {
            Some(old) if !Arc::ptr_eq(&old, &connection) => {
                old.shutdown();
                tracing::info!(
                    user_id = %user_id,
                    old_session = %old.session_id(),
                    new_session = %connection.session_id(),
                    "Displaced prior connection"
                );
                Some(old)
            }
            _ => {
                tracing::debug!(
                    user_id = %user_id,
                    session_id = %connection.session_id(),
                    "Connection registered"
                );
                None
            }
        }
    }

    /// Remove a user's entry only if it still points at `connection`
    ///
    /// A stale close (an old session tearing down after it was displaced)
    /// must never evict the newer connection. Returns whether an entry was
    /// removed.
    pub fn unregister(&self, user_id: Uuid, connection: &Arc<Connection>) -> bool {
        let removed = self
            .connections
            .remove_if(&user_id, |_, current| {
                current.session_id() == connection.session_id()
            })
            .is_some();

        if removed {
            tracing::debug!(
                user_id = %user_id,
                session_id = %connection.session_id(),
                "Connection unregistered"
            );
        }

        removed
    }

    /// Look up a user's live connection
    pub fn lookup(&self, user_id: Uuid) -> Option<Arc<Connection>> {
        self.connections.get(&user_id).map(|r| Arc::clone(r.value()))
    }

    /// Check if a user currently has a live connection
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.connections.contains_key(&user_id)
    }

    /// Number of users with a live connection
    pub fn online_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("online", &self.connections.len())
            .finish()
    }
}
