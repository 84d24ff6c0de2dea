//! Client-side typing debounce
//!
//! Emits `isTyping: true` on the first keystroke after an idle period and
//! `isTyping: false` once no keystroke has arrived for the idle timeout.
//! The server keeps no typing state; this is the only debounce in the
//! system.

use confab_core::ClientEvent;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Default idle period after the last keystroke
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(1);

struct TypingState {
    /// Bumped on every keystroke; a scheduled stop only fires if it still
    /// holds the generation it was scheduled with
    generation: u64,
    active: bool,
}

/// Debounces local keystrokes into typing start/stop events
pub struct TypingDebouncer {
    idle_timeout: Duration,
    outbound: mpsc::Sender<ClientEvent>,
    states: Arc<Mutex<HashMap<Uuid, TypingState>>>,
}

impl TypingDebouncer {
    /// Create a debouncer writing into the connection's outbound queue
    pub fn new(idle_timeout: Duration, outbound: mpsc::Sender<ClientEvent>) -> Self {
        Self {
            idle_timeout,
            outbound,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a local keystroke in a conversation
    pub fn keystroke(&self, conversation_id: Uuid) {
        let generation = {
            let mut states = self.states.lock();
            let state = states.entry(conversation_id).or_insert(TypingState {
                generation: 0,
                active: false,
            });
            state.generation += 1;

            if !state.active {
                state.active = true;
                let _ = self.outbound.try_send(ClientEvent::Typing {
                    conversation_id,
                    is_typing: true,
                });
            }

            state.generation
        };

        let states = Arc::clone(&self.states);
        let outbound = self.outbound.clone();
        let idle_timeout = self.idle_timeout;

        tokio::spawn(async move {
            tokio::time::sleep(idle_timeout).await;

            let mut states = states.lock();
            if let Some(state) = states.get_mut(&conversation_id) {
                if state.generation == generation && state.active {
                    state.active = false;
                    let _ = outbound.try_send(ClientEvent::Typing {
                        conversation_id,
                        is_typing: false,
                    });
                }
            }
        });
    }
}
