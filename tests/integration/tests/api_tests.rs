//! REST API tests: accounts, conversations, and history pagination

use integration_tests::helpers::TestApp;
use reqwest::StatusCode;
use serde_json::json;

async fn register(app: &TestApp, username: &str) -> serde_json::Value {
    let response = app
        .http
        .post(format!("{}/auth/register", app.base_url()))
        .json(&json!({
            "username": username,
            "password": "a long enough password",
        }))
        .send()
        .await
        .expect("register request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("register body")
}

#[tokio::test]
async fn register_login_and_fetch_own_profile() {
    let app = TestApp::spawn().await;

    let registered = register(&app, "ada").await;
    assert_eq!(registered["user"]["username"], "ada");
    assert_eq!(registered["tokenType"], "Bearer");

    let login = app
        .http
        .post(format!("{}/auth/login", app.base_url()))
        .json(&json!({
            "username": "ada",
            "password": "a long enough password",
        }))
        .send()
        .await
        .expect("login request");
    assert_eq!(login.status(), StatusCode::OK);
    let login: serde_json::Value = login.json().await.expect("login body");

    let me = app
        .http
        .get(format!("{}/users/@me", app.base_url()))
        .bearer_auth(login["token"].as_str().unwrap())
        .send()
        .await
        .expect("me request");
    assert_eq!(me.status(), StatusCode::OK);
    let me: serde_json::Value = me.json().await.expect("me body");

    assert_eq!(me["id"], registered["user"]["id"]);
    assert_eq!(me["username"], "ada");
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let app = TestApp::spawn().await;

    register(&app, "ada").await;

    let response = app
        .http
        .post(format!("{}/auth/register", app.base_url()))
        .json(&json!({
            "username": "ada",
            "password": "another long password",
        }))
        .send()
        .await
        .expect("second register request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await.expect("conflict body");
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    register(&app, "ada").await;

    let response = app
        .http
        .post(format!("{}/auth/login", app.base_url()))
        .json(&json!({
            "username": "ada",
            "password": "wrong password entirely",
        }))
        .send()
        .await
        .expect("login request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .http
        .get(format!("{}/conversations", app.base_url()))
        .send()
        .await
        .expect("unauthenticated request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn direct_conversations_deduplicate_per_pair() {
    let app = TestApp::spawn().await;
    let ada = register(&app, "ada").await;
    let ada_token = ada["token"].as_str().unwrap();
    let grace = register(&app, "grace").await;
    let grace_token = grace["token"].as_str().unwrap();

    let first = app
        .http
        .post(format!("{}/conversations", app.base_url()))
        .bearer_auth(ada_token)
        .json(&json!({
            "kind": "direct",
            "participantIds": [grace["user"]["id"]],
        }))
        .send()
        .await
        .expect("create conversation");
    assert_eq!(first.status(), StatusCode::CREATED);
    let first: serde_json::Value = first.json().await.expect("first body");

    // grace opening the pair conversation lands on the same one
    let second = app
        .http
        .post(format!("{}/conversations", app.base_url()))
        .bearer_auth(grace_token)
        .json(&json!({
            "kind": "direct",
            "participantIds": [ada["user"]["id"]],
        }))
        .send()
        .await
        .expect("create conversation again");
    let second: serde_json::Value = second.json().await.expect("second body");

    assert_eq!(first["id"], second["id"]);
    assert_eq!(first["participants"].as_array().unwrap().len(), 2);

    let listed = app
        .http
        .get(format!("{}/conversations", app.base_url()))
        .bearer_auth(grace_token)
        .send()
        .await
        .expect("list conversations");
    let listed: serde_json::Value = listed.json().await.expect("list body");
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn foreign_conversations_are_invisible() {
    let app = TestApp::spawn().await;
    let (alice, _) = app.seed_user("alice").await;
    let (bob, _) = app.seed_user("bob").await;
    let (_, mallory_token) = app.seed_user("mallory").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let response = app
        .http
        .get(format!("{}/conversations/{conversation_id}", app.base_url()))
        .bearer_auth(&mallory_token)
        .send()
        .await
        .expect("get conversation");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_pages_backwards_with_the_before_cursor() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, _) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let mut ids = Vec::new();
    for content in ["one", "two", "three"] {
        let created = app.post_message(&alice_token, conversation_id, content).await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }

    // newest page of two
    let response = app
        .http
        .get(format!(
            "{}/conversations/{conversation_id}/messages?limit=2",
            app.base_url()
        ))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("latest page");
    let page: serde_json::Value = response.json().await.expect("page body");
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["id"], ids[1].as_str());
    assert_eq!(page[1]["id"], ids[2].as_str());

    // page before the oldest of those two
    let response = app
        .http
        .get(format!(
            "{}/conversations/{conversation_id}/messages?limit=2&before={}",
            app.base_url(),
            ids[1]
        ))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("previous page");
    let previous: serde_json::Value = response.json().await.expect("previous body");
    let previous = previous.as_array().unwrap();
    assert_eq!(previous.len(), 1);
    assert_eq!(previous[0]["id"], ids[0].as_str());
}

#[tokio::test]
async fn blank_messages_are_rejected() {
    let app = TestApp::spawn().await;
    let (alice, alice_token) = app.seed_user("alice").await;
    let (bob, _) = app.seed_user("bob").await;
    let conversation_id = app.seed_conversation(&[alice, bob]).await;

    let response = app
        .http
        .post(format!(
            "{}/conversations/{conversation_id}/messages",
            app.base_url()
        ))
        .bearer_auth(&alice_token)
        .json(&json!({ "content": "   " }))
        .send()
        .await
        .expect("blank message request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
