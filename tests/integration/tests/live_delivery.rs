//! End-to-end live delivery scenarios
//!
//! Drives the real server over REST and the live transport: messages are
//! persisted through REST and pushed to online participants, typing events
//! are relayed peer-to-peer, offline participants catch up via history.

use std::time::Duration;

use confab_core::{ClientEvent, ServerEvent};
use integration_tests::helpers::{
    expect_closed, expect_server_event, expect_silence, send_client_event, TestApp,
};
use futures_util::SinkExt;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn message_is_pushed_to_online_participant_exactly_once() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut bob_ws = app.connect_authenticated(bob, &bob_token).await;

    let created = app.post_message(&alice_token, conversation_id, "hi").await;
    assert_eq!(created["content"], "hi");
    assert_eq!(created["conversationId"], conversation_id.to_string());

    match expect_server_event(&mut bob_ws).await {
        ServerEvent::NewMessage {
            conversation_id: pushed_conversation,
            message,
        } => {
            assert_eq!(pushed_conversation, conversation_id);
            assert_eq!(message.id.to_string(), created["id"]);
            assert_eq!(message.content, "hi");
            assert_eq!(message.sender_id, alice);
            assert_eq!(message.sender.username, "alice");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // exactly one push for one persisted message
    expect_silence(&mut bob_ws, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn sender_does_not_receive_its_own_push() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut alice_ws = app.connect_authenticated(alice, &alice_token).await;
    let mut bob_ws = app.connect_authenticated(bob, &bob_token).await;

    // the sender learns of the message from the REST response instead
    let created = app.post_message(&alice_token, conversation_id, "hi").await;
    assert_eq!(created["content"], "hi");

    match expect_server_event(&mut bob_ws).await {
        ServerEvent::NewMessage { message, .. } => assert_eq!(message.sender_id, alice),
        other => panic!("unexpected event: {other:?}"),
    }
    expect_silence(&mut alice_ws, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn offline_participant_catches_up_through_history() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    // bob never connects; no push happens anywhere
    let first = app.post_message(&alice_token, conversation_id, "hi").await;
    let second = app.post_message(&alice_token, conversation_id, "you there?").await;

    let history = app.fetch_history(&bob_token, conversation_id).await;
    let messages = history.as_array().expect("history array");

    // chronological order, newest at the end
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["id"], first["id"]);
    assert_eq!(messages[1]["id"], second["id"]);
}

#[tokio::test]
async fn typing_indicator_is_relayed_and_attributed() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut alice_ws = app.connect_authenticated(alice, &alice_token).await;
    let mut bob_ws = app.connect_authenticated(bob, &bob_token).await;

    send_client_event(
        &mut alice_ws,
        &ClientEvent::Typing {
            conversation_id,
            is_typing: true,
        },
    )
    .await;

    match expect_server_event(&mut bob_ws).await {
        ServerEvent::Typing {
            conversation_id: relayed_conversation,
            user_id,
            is_typing,
        } => {
            assert_eq!(relayed_conversation, conversation_id);
            assert_eq!(user_id, alice);
            assert!(is_typing);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // the typer never receives its own indicator
    expect_silence(&mut alice_ws, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn newer_login_displaces_the_older_connection() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut first_ws = app.connect_authenticated(bob, &bob_token).await;
    let mut second_ws = app.connect_ws().await;
    send_client_event(
        &mut second_ws,
        &ClientEvent::Auth {
            token: bob_token.clone(),
        },
    )
    .await;

    // the first socket is closed server-side when the second registers
    expect_closed(&mut first_ws).await;

    app.post_message(&alice_token, conversation_id, "hi").await;

    match expect_server_event(&mut second_ws).await {
        ServerEvent::NewMessage { message, .. } => assert_eq!(message.content, "hi"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn events_before_auth_are_ignored_and_auth_still_works() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut alice_ws = app.connect_authenticated(alice, &alice_token).await;

    let mut bob_ws = app.connect_ws().await;
    // typing before auth: no identity to attribute it to, silently dropped
    send_client_event(
        &mut bob_ws,
        &ClientEvent::Typing {
            conversation_id,
            is_typing: true,
        },
    )
    .await;
    expect_silence(&mut alice_ws, Duration::from_millis(300)).await;

    // the same socket can still authenticate afterwards
    send_client_event(&mut bob_ws, &ClientEvent::Auth { token: bob_token }).await;
    app.wait_until_online(bob).await;

    app.post_message(&alice_token, conversation_id, "hi").await;
    match expect_server_event(&mut bob_ws).await {
        ServerEvent::NewMessage { message, .. } => assert_eq!(message.content, "hi"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_auth_token_closes_the_connection() {
    let app = TestApp::spawn().await;

    let mut ws = app.connect_ws().await;
    send_client_event(
        &mut ws,
        &ClientEvent::Auth {
            token: "not-a-real-token".to_string(),
        },
    )
    .await;

    expect_closed(&mut ws).await;
}

#[tokio::test]
async fn malformed_frames_do_not_kill_the_session() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut bob_ws = app.connect_authenticated(bob, &bob_token).await;

    // garbage and unknown event types are dropped, the session stays open
    bob_ws
        .send(Message::Text("{definitely not json".to_string()))
        .await
        .expect("send garbage");
    bob_ws
        .send(Message::Text(
            r#"{"type":"heartbeat","seq":42}"#.to_string(),
        ))
        .await
        .expect("send unknown event");

    app.post_message(&alice_token, conversation_id, "still here?").await;

    match expect_server_event(&mut bob_ws).await {
        ServerEvent::NewMessage { message, .. } => assert_eq!(message.content, "still here?"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn non_participants_never_receive_pushes() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, _) = app.seed_user("bob").await;
    let (carol, carol_token) = app.seed_user("carol").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut carol_ws = app.connect_authenticated(carol, &carol_token).await;

    app.post_message(&alice_token, conversation_id, "private").await;

    expect_silence(&mut carol_ws, Duration::from_millis(300)).await;
}
