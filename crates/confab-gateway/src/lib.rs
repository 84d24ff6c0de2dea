//! # confab-gateway
//!
//! The live-delivery subsystem: a per-user connection registry, per-socket
//! transport sessions, and best-effort broadcast of wire events to online
//! conversation participants.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod server;

pub use broadcast::Dispatcher;
pub use connection::{Connection, ConnectionRegistry, SessionState};
pub use server::{gateway_handler, gateway_routes, GatewayContext};
