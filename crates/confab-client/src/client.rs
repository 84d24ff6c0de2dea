//! Chat client
//!
//! Maintains a single logical connection to the server's live transport. A
//! background task owns the socket: it authenticates on open, merges pushed
//! messages into the local cache, and reconnects with exponential backoff
//! until the ceiling is reached.

use std::sync::Arc;
use std::time::Duration;

use confab_core::{ClientEvent, MessageRecord, ServerEvent};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use crate::backoff::ReconnectPolicy;
use crate::cache::MessageCache;
use crate::typing::{TypingDebouncer, DEFAULT_IDLE_TIMEOUT};

/// Connection status surfaced to the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Notifications delivered to the UI layer
#[derive(Debug, Clone)]
pub enum Notification {
    /// A new message was merged into the local cache
    Message {
        conversation_id: Uuid,
        message: MessageRecord,
    },
    /// A participant's typing state changed (advisory; never cached)
    Typing {
        conversation_id: Uuid,
        user_id: Uuid,
        is_typing: bool,
    },
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Live transport URL, e.g. `ws://localhost:8080/gateway`
    pub url: String,
    /// Signed access token sent in the auth handshake
    pub token: String,
    /// Reconnection backoff policy
    pub reconnect: ReconnectPolicy,
    /// Idle period ending a local typing burst
    pub typing_idle: Duration,
}

impl ClientConfig {
    /// Create a configuration with default reconnect and typing settings
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            reconnect: ReconnectPolicy::default(),
            typing_idle: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

/// Handle to the logical connection
pub struct ChatClient {
    cache: Arc<MessageCache>,
    typing: TypingDebouncer,
    status_rx: watch::Receiver<ConnectionStatus>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ChatClient {
    /// Spawn the connection task
    ///
    /// Returns the client handle and the stream of UI notifications.
    pub fn connect(config: ClientConfig) -> (Self, mpsc::Receiver<Notification>) {
        let cache = Arc::new(MessageCache::new());
        let (notify_tx, notify_rx) = mpsc::channel(256);
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Disconnected);
        let (outbound_tx, outbound_rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let typing = TypingDebouncer::new(config.typing_idle, outbound_tx);

        let task = tokio::spawn(run_connection(
            config,
            Arc::clone(&cache),
            status_tx,
            notify_tx,
            outbound_rx,
            shutdown_rx,
        ));

        (
            Self {
                cache,
                typing,
                status_rx,
                shutdown_tx,
                task,
            },
            notify_rx,
        )
    }

    /// Current connection status
    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Watch connection status changes
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// Snapshot the cached messages of a conversation, oldest first
    pub fn messages(&self, conversation_id: Uuid) -> Vec<MessageRecord> {
        self.cache.conversation(conversation_id)
    }

    /// Merge a REST history page into the cache, returning how many
    /// records were new (already-pushed messages are skipped)
    pub fn merge_history(&self, records: Vec<MessageRecord>) -> usize {
        self.cache.merge_history(records)
    }

    /// Record a local keystroke; emits debounced typing events
    pub fn keystroke(&self, conversation_id: Uuid) {
        self.typing.keystroke(conversation_id);
    }

    /// Stop the connection task and wait for it to finish
    pub async fn close(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}

/// Connection loop: connect, authenticate, run the session, back off, retry
async fn run_connection(
    config: ClientConfig,
    cache: Arc<MessageCache>,
    status_tx: watch::Sender<ConnectionStatus>,
    notify_tx: mpsc::Sender<Notification>,
    mut outbound_rx: mpsc::Receiver<ClientEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut attempts: u32 = 0;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let _ = status_tx.send(ConnectionStatus::Connecting);

        match connect_async(config.url.as_str()).await {
            Ok((socket, _response)) => {
                let (mut sink, mut stream) = socket.split();

                let auth = ClientEvent::Auth {
                    token: config.token.clone(),
                };
                let authenticated = match auth.to_json() {
                    Ok(json) => sink.send(Message::Text(json)).await.is_ok(),
                    Err(_) => false,
                };

                if authenticated {
                    let _ = status_tx.send(ConnectionStatus::Connected);
                    attempts = 0;
                    tracing::info!(url = %config.url, "Connected and authenticated");

                    run_session(
                        &mut sink,
                        &mut stream,
                        &cache,
                        &notify_tx,
                        &mut outbound_rx,
                        &mut shutdown_rx,
                    )
                    .await;

                    let _ = sink.close().await;
                }
            }
            Err(e) => {
                tracing::warn!(url = %config.url, error = %e, "Connection attempt failed");
            }
        }

        let _ = status_tx.send(ConnectionStatus::Disconnected);

        if *shutdown_rx.borrow() {
            break;
        }

        match config.reconnect.delay_for(attempts) {
            Some(delay) => {
                attempts += 1;
                tracing::debug!(
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Scheduling reconnect"
                );
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    _ = shutdown_rx.changed() => break,
                }
            }
            None => {
                // Past the ceiling the UI must offer a manual retry
                tracing::warn!(
                    attempts = attempts,
                    "Reconnect ceiling reached, staying disconnected"
                );
                break;
            }
        }
    }

    let _ = status_tx.send(ConnectionStatus::Disconnected);
}

/// Drive one live session until the socket closes or shutdown is requested
async fn run_session<Si, St>(
    sink: &mut Si,
    stream: &mut St,
    cache: &MessageCache,
    notify_tx: &mpsc::Sender<Notification>,
    outbound_rx: &mut mpsc::Receiver<ClientEvent>,
    shutdown_rx: &mut watch::Receiver<bool>,
) where
    Si: Sink<Message> + Unpin,
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => return,
            outbound = outbound_rx.recv() => match outbound {
                Some(event) => {
                    let Ok(json) = event.to_json() else { continue };
                    if sink.send(Message::Text(json)).await.is_err() {
                        return;
                    }
                }
                None => return,
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_frame(&text, cache, notify_tx),
                Some(Ok(Message::Close(_))) | None => return,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Transport error");
                    return;
                }
            }
        }
    }
}

/// Merge one pushed frame into local state
fn handle_frame(text: &str, cache: &MessageCache, notify_tx: &mpsc::Sender<Notification>) {
    match ServerEvent::from_json(text) {
        Ok(ServerEvent::NewMessage {
            conversation_id,
            message,
        }) => {
            // idempotent merge: the same record may also arrive through a
            // concurrent REST refetch
            if cache.merge(message.clone()) {
                let _ = notify_tx.try_send(Notification::Message {
                    conversation_id,
                    message,
                });
            }
        }
        Ok(ServerEvent::Typing {
            conversation_id,
            user_id,
            is_typing,
        }) => {
            let _ = notify_tx.try_send(Notification::Typing {
                conversation_id,
                user_id,
                is_typing,
            });
        }
        Err(e) => {
            tracing::debug!(error = %e, "Dropping unparseable frame");
        }
    }
}
