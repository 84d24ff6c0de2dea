//! # confab-db
//!
//! PostgreSQL implementations of the repository ports defined in
//! `confab-core`.

pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations, PoolConfig, PoolError};
pub use repositories::{PgConversationRepository, PgMessageRepository, PgUserRepository};
pub use sqlx::PgPool;
