//! Database pool setup

mod postgres;

pub use postgres::{create_pool, run_migrations, PoolConfig, PoolError};
