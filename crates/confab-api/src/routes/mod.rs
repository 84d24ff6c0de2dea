//! Route definitions
//!
//! REST routes organized by domain and mounted under /api/v1. The live
//! transport endpoint is mounted separately in `server::create_app`.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, conversations, health, messages, users};
use crate::state::AppState;

/// Create the main API router with all REST routes
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(conversation_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/@me", get(users::get_current_user))
}

/// Conversation and message routes
fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations",
            post(conversations::create_conversation).get(conversations::list_conversations),
        )
        .route(
            "/conversations/:conversation_id",
            get(conversations::get_conversation),
        )
        .route(
            "/conversations/:conversation_id/messages",
            get(messages::get_messages).post(messages::create_message),
        )
}
