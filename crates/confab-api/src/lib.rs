//! # confab-api
//!
//! The server binary: REST endpoints for accounts, conversations, and
//! messages, plus the `/gateway` live transport endpoint, all in one
//! process sharing one connection registry.

pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
