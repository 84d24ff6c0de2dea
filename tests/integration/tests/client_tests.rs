//! End-to-end tests of the `confab-client` reconnection manager against the
//! real server

use std::time::Duration;

use confab_client::{ChatClient, ClientConfig, ConnectionStatus, Notification, ReconnectPolicy};
use confab_core::{MessageRecord, ServerEvent};
use integration_tests::helpers::{expect_server_event, TestApp};

async fn wait_for_status(client: &ChatClient, wanted: ConnectionStatus) {
    let mut rx = client.watch_status();
    for _ in 0..200 {
        if *rx.borrow() == wanted {
            return;
        }
        tokio::time::timeout(Duration::from_millis(50), rx.changed())
            .await
            .ok();
    }
    panic!("client never reached {wanted:?}");
}

#[tokio::test]
async fn client_receives_push_and_deduplicates_the_refetch() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let (client, mut notifications) =
        ChatClient::connect(ClientConfig::new(app.ws_url(), bob_token.clone()));
    wait_for_status(&client, ConnectionStatus::Connected).await;
    app.wait_until_online(bob).await;

    let created = app.post_message(&alice_token, conversation_id, "hi").await;

    let notification = tokio::time::timeout(Duration::from_secs(2), notifications.recv())
        .await
        .expect("timed out waiting for notification")
        .expect("notification channel closed");

    match notification {
        Notification::Message { message, .. } => {
            assert_eq!(message.id.to_string(), created["id"]);
            assert_eq!(message.content, "hi");
        }
        other => panic!("unexpected notification: {other:?}"),
    }

    // a concurrent REST refetch of the same history merges to nothing new
    let history = app.fetch_history(&bob_token, conversation_id).await;
    let records: Vec<MessageRecord> =
        serde_json::from_value(history).expect("parse history records");
    assert_eq!(client.merge_history(records), 0);
    assert_eq!(client.messages(conversation_id).len(), 1);

    client.close().await;
}

#[tokio::test]
async fn client_typing_debounce_reaches_the_peer_once() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, bob_token) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut alice_ws = app.connect_authenticated(alice, &alice_token).await;

    let (client, _notifications) =
        ChatClient::connect(ClientConfig::new(app.ws_url(), bob_token));
    wait_for_status(&client, ConnectionStatus::Connected).await;
    app.wait_until_online(bob).await;

    // a burst of keystrokes produces one start event...
    client.keystroke(conversation_id);
    client.keystroke(conversation_id);
    client.keystroke(conversation_id);

    match expect_server_event(&mut alice_ws).await {
        ServerEvent::Typing {
            user_id, is_typing, ..
        } => {
            assert_eq!(user_id, bob);
            assert!(is_typing);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // ...and one stop event once the second of idle has passed
    match expect_server_event(&mut alice_ws).await {
        ServerEvent::Typing {
            user_id, is_typing, ..
        } => {
            assert_eq!(user_id, bob);
            assert!(!is_typing);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    client.close().await;
}

#[tokio::test]
async fn client_stops_retrying_after_the_ceiling() {
    // nothing listens on this port
    let config = ClientConfig {
        url: "ws://127.0.0.1:9/gateway".to_string(),
        token: "irrelevant".to_string(),
        reconnect: ReconnectPolicy {
            base: Duration::from_millis(10),
            max_attempts: 2,
        },
        typing_idle: Duration::from_secs(1),
    };

    let (client, _notifications) = ChatClient::connect(config);

    // attempts 0 and 1 run (10ms + 20ms), then the ceiling stops the loop
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(client.status(), ConnectionStatus::Disconnected);

    client.close().await;
}
