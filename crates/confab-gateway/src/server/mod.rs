//! Gateway server setup
//!
//! Exposes the live transport endpoint as a router that the main server
//! merges next to its REST routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayContext;

use axum::{routing::get, Router};

/// Build the router exposing the live transport endpoint
pub fn gateway_routes(ctx: GatewayContext) -> Router {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .with_state(ctx)
}
