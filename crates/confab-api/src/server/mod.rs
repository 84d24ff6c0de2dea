//! Server setup
//!
//! Wires repositories, services, and the gateway into one axum application
//! and runs it. REST and the live transport share one process and one
//! connection registry; a message persisted through REST is pushed through
//! the same registry the `/gateway` sessions register in.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use confab_common::{AppConfig, AppError, CorsConfig, JwtService};
use confab_core::ConversationRepository;
use confab_gateway::{gateway_routes, ConnectionRegistry, Dispatcher, GatewayContext};
use confab_service::ServiceContextBuilder;

use crate::routes;
use crate::state::AppState;

/// Build the complete application
pub fn create_app(state: AppState) -> Router {
    let gateway_router = gateway_routes(state.gateway().clone());
    let cors = cors_layer(&state.config().cors);

    Router::new()
        .merge(routes::create_router())
        .merge(routes::health_routes())
        .with_state(state)
        .merge(gateway_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Build the CORS layer from configuration
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Initialize all dependencies and create `AppState`
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let pool_config = confab_db::PoolConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = confab_db::create_pool(&pool_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    confab_db::run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    let jwt = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.token_expiry_secs,
    ));

    let users = Arc::new(confab_db::PgUserRepository::new(pool.clone()));
    let conversations: Arc<dyn ConversationRepository> =
        Arc::new(confab_db::PgConversationRepository::new(pool.clone()));
    let messages = Arc::new(confab_db::PgMessageRepository::new(pool.clone()));

    // One registry serves both the REST push path and the /gateway sessions
    let registry = ConnectionRegistry::new_shared();
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry)));

    let services = ServiceContextBuilder::new()
        .users(users)
        .conversations(Arc::clone(&conversations))
        .messages(messages)
        .jwt(Arc::clone(&jwt))
        .dispatcher(dispatcher)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let gateway = GatewayContext::new(
        registry,
        conversations,
        jwt,
        config.gateway.outbound_buffer,
    );

    Ok(AppState::new(services, gateway, config))
}

/// Run the server on the given address
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("REST at http://{addr}/api/v1, live transport at ws://{addr}/gateway");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
