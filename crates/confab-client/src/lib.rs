//! # confab-client
//!
//! Client counterpart of the live transport: maintains one logical
//! connection per session with exponential backoff and re-authentication,
//! deduplicates messages arriving both through the live push and REST
//! refetches, and debounces local typing indicators.

pub mod backoff;
pub mod cache;
pub mod client;
pub mod typing;

pub use backoff::ReconnectPolicy;
pub use cache::MessageCache;
pub use client::{ChatClient, ClientConfig, ConnectionStatus, Notification};
pub use typing::TypingDebouncer;
