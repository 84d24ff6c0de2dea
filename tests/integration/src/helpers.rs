//! Test server lifecycle and protocol helpers

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use confab_api::{create_app, AppState};
use confab_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, GatewayConfig, JwtConfig,
    JwtService, ServerConfig,
};
use confab_core::{
    ClientEvent, Conversation, ConversationRepository, ServerEvent, User, UserRepository,
};
use confab_gateway::{ConnectionRegistry, Dispatcher, GatewayContext};
use confab_service::ServiceContextBuilder;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use crate::fixtures::{MemoryConversations, MemoryMessages, MemoryUsers};

/// A live socket to the test server's gateway endpoint
pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const JWT_SECRET: &str = "integration-test-secret";

/// The spawned application plus handles for seeding and inspection
pub struct TestApp {
    pub addr: SocketAddr,
    pub http: reqwest::Client,
    pub jwt: Arc<JwtService>,
    pub users: Arc<MemoryUsers>,
    pub conversations: Arc<MemoryConversations>,
    pub registry: Arc<ConnectionRegistry>,
    _server: JoinHandle<()>,
}

impl TestApp {
    /// Spawn the real application on an ephemeral port over in-memory repos
    pub async fn spawn() -> Self {
        let users = Arc::new(MemoryUsers::default());
        let conversations = Arc::new(MemoryConversations::default());
        let messages = Arc::new(MemoryMessages::default());
        let jwt = Arc::new(JwtService::new(JWT_SECRET, 900));

        let registry = ConnectionRegistry::new_shared();
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry)));

        let services = ServiceContextBuilder::new()
            .users(Arc::clone(&users) as Arc<dyn UserRepository>)
            .conversations(Arc::clone(&conversations) as Arc<dyn ConversationRepository>)
            .messages(messages)
            .jwt(Arc::clone(&jwt))
            .dispatcher(dispatcher)
            .build()
            .expect("all context dependencies provided");

        let gateway = GatewayContext::new(
            Arc::clone(&registry),
            Arc::clone(&conversations) as Arc<dyn ConversationRepository>,
            Arc::clone(&jwt),
            64,
        );

        let state = AppState::new(services, gateway, test_config());
        let app = create_app(state);

        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("build http client");

        Self {
            addr,
            http,
            jwt,
            users,
            conversations,
            registry,
            _server: server,
        }
    }

    /// Base URL for REST requests
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// URL of the live transport endpoint
    pub fn ws_url(&self) -> String {
        format!("ws://{}/gateway", self.addr)
    }

    /// Seed a user directly, returning its id and a valid token
    pub async fn seed_user(&self, username: &str) -> (Uuid, String) {
        let user = User::new(Uuid::new_v4(), username.to_string());
        self.users
            .create(&user, "seeded-hash")
            .await
            .expect("seed user");
        let token = self.jwt.issue(user.id).expect("issue token");
        (user.id, token)
    }

    /// Seed a group conversation directly
    pub async fn seed_conversation(&self, participant_ids: &[Uuid]) -> Uuid {
        let conversation = Conversation::new_group(Uuid::new_v4(), None);
        self.conversations
            .create(&conversation, participant_ids)
            .await
            .expect("seed conversation");
        conversation.id
    }

    /// Open a raw socket to the gateway without authenticating
    pub async fn connect_ws(&self) -> WsClient {
        let (socket, _) = connect_async(self.ws_url()).await.expect("ws connect");
        socket
    }

    /// Open a socket, authenticate it, and wait until the registry has it
    pub async fn connect_authenticated(&self, user_id: Uuid, token: &str) -> WsClient {
        let mut socket = self.connect_ws().await;
        send_client_event(
            &mut socket,
            &ClientEvent::Auth {
                token: token.to_string(),
            },
        )
        .await;
        self.wait_until_online(user_id).await;
        socket
    }

    /// Poll the registry until a user's connection is registered
    pub async fn wait_until_online(&self, user_id: Uuid) {
        for _ in 0..100 {
            if self.registry.is_online(user_id) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("user {user_id} never came online");
    }

    /// POST a message over REST, returning the created record as JSON
    pub async fn post_message(
        &self,
        token: &str,
        conversation_id: Uuid,
        content: &str,
    ) -> serde_json::Value {
        let response = self
            .http
            .post(format!(
                "{}/conversations/{conversation_id}/messages",
                self.base_url()
            ))
            .bearer_auth(token)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .expect("send message request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("message response body")
    }

    /// GET a conversation's history over REST
    pub async fn fetch_history(&self, token: &str, conversation_id: Uuid) -> serde_json::Value {
        let response = self
            .http
            .get(format!(
                "{}/conversations/{conversation_id}/messages",
                self.base_url()
            ))
            .bearer_auth(token)
            .send()
            .await
            .expect("history request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("history body")
    }
}

/// Send one client event as a text frame
pub async fn send_client_event(socket: &mut WsClient, event: &ClientEvent) {
    let json = event.to_json().expect("serialize client event");
    socket
        .send(Message::Text(json))
        .await
        .expect("send ws frame");
}

/// Receive the next server event, failing after two seconds
pub async fn expect_server_event(socket: &mut WsClient) -> ServerEvent {
    let deadline = Duration::from_secs(2);
    loop {
        let frame = tokio::time::timeout(deadline, socket.next())
            .await
            .expect("timed out waiting for server event")
            .expect("socket closed while waiting for server event")
            .expect("transport error while waiting for server event");

        match frame {
            Message::Text(text) => {
                return ServerEvent::from_json(&text).expect("parse server event")
            }
            // tolerate control frames
            Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Assert that no server event arrives within the window
pub async fn expect_silence(socket: &mut WsClient, window: Duration) {
    let result = tokio::time::timeout(window, socket.next()).await;
    match result {
        Err(_) => {}
        Ok(Some(Ok(Message::Text(text)))) => panic!("unexpected event: {text}"),
        Ok(Some(Ok(_)) | None) => {}
        Ok(Some(Err(e))) => panic!("transport error: {e}"),
    }
}

/// Wait for the socket to be closed by the server
pub async fn expect_closed(socket: &mut WsClient) {
    let deadline = Duration::from_secs(2);
    loop {
        match tokio::time::timeout(deadline, socket.next())
            .await
            .expect("timed out waiting for close")
        {
            Some(Ok(Message::Close(_))) | None => return,
            Some(Ok(_)) => {}
            Some(Err(_)) => return,
        }
    }
}

/// Build a config for the spawned application (the listener port is bound
/// separately, so the configured port is unused)
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "confab-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            token_expiry_secs: 900,
        },
        cors: CorsConfig::default(),
        gateway: GatewayConfig::default(),
    }
}
