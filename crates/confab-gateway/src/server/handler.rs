//! WebSocket handler
//!
//! Owns the socket for the lifetime of one transport session and drives the
//! session state machine: connecting → authenticated → closed. The session
//! always reaches the terminal state, deregistering its identity exactly
//! when it is still the registered one.

use crate::connection::{Connection, SessionState};
use crate::handlers::EventRouter;
use crate::server::GatewayContext;
use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
};
use confab_core::ServerEvent;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(ctx): State<GatewayContext>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(ctx, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(ctx: GatewayContext, socket: axum::extract::ws::WebSocket) {
    let session_id = Uuid::new_v4().to_string();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(ctx.outbound_buffer());
    let connection = Connection::new(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "Transport session opened");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Drain the outbound queue into the socket until every sender is gone.
    let session_id_send = session_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        tracing::debug!(
                            session_id = %session_id_send,
                            "Socket write failed, stopping send task"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_send,
                        error = %e,
                        "Failed to serialize outbound event"
                    );
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    loop {
        tokio::select! {
            // Displaced by a newer connection for the same user
            () = connection.closed() => {
                tracing::info!(
                    session_id = %session_id,
                    "Session replaced by a newer connection"
                );
                break;
            }
            frame = ws_stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if EventRouter::dispatch(&ctx, &connection, &text).await {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    tracing::info!(session_id = %session_id, "Client closed connection");
                    break;
                }
                Some(Ok(_)) => {
                    // Binary/ping/pong frames carry no events
                    tracing::trace!(session_id = %session_id, "Ignoring non-text frame");
                }
                Some(Err(e)) => {
                    tracing::warn!(session_id = %session_id, error = %e, "Transport error");
                    break;
                }
                None => break,
            }
        }
    }

    // Terminal state: deregister only if the registry entry is still ours.
    connection.set_state(SessionState::Closed).await;
    if let Some(user_id) = connection.user_id().await {
        ctx.registry().unregister(user_id, &connection);
    }

    // Dropping our handle releases the last long-lived sender; the send
    // task then drains, closes the sink, and exits.
    drop(connection);
    let _ = send_task.await;

    tracing::info!(session_id = %session_id, "Transport session closed");
}
