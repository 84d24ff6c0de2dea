//! Broadcast dispatcher
//!
//! Pushes an event to every currently connected participant of a
//! conversation. Delivery is fire-and-forget: offline participants are
//! skipped silently and catch up through the REST history endpoint, and a
//! recipient whose outbound queue is full or torn down counts as offline
//! for that push. No registry shard guard is held across any await point
//! (there are none on this path).

use crate::connection::ConnectionRegistry;
use confab_core::ServerEvent;
use std::sync::Arc;
use uuid::Uuid;

/// Dispatches events to the live connections of conversation participants
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    /// Create a new dispatcher over a registry
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher delivers through
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Push `event` to every online participant, except `exclude`
    ///
    /// Returns the number of connections the event was queued to.
    pub fn broadcast(
        &self,
        participant_ids: &[Uuid],
        event: &ServerEvent,
        exclude: Option<Uuid>,
    ) -> usize {
        let mut delivered = 0;

        for &user_id in participant_ids {
            if exclude == Some(user_id) {
                continue;
            }

            // lookup clones the Arc out of the shard; no guard survives this
            let Some(connection) = self.registry.lookup(user_id) else {
                continue;
            };

            match connection.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(
                        user_id = %user_id,
                        session_id = %connection.session_id(),
                        error = %e,
                        "Recipient unreachable, skipping"
                    );
                }
            }
        }

        tracing::trace!(
            event_type = %event.event_type(),
            recipients = participant_ids.len(),
            delivered = delivered,
            "Event dispatched"
        );

        delivered
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish()
    }
}
