//! Integration test support
//!
//! Spawns the real axum application on an ephemeral port with in-memory
//! repository fakes, then drives it over HTTP (reqwest) and the live
//! transport (tokio-tungstenite).

pub mod fixtures;
pub mod helpers;
