//! Transport sessions and the per-user connection registry

mod connection;
mod registry;

pub use connection::{Connection, SessionState};
pub use registry::ConnectionRegistry;
