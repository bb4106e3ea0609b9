//! Database Module
//!
//! Repository traits plus their PostgreSQL and in-memory implementations.

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::*;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::core::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Open the connection pool and apply pending migrations
pub async fn connect(config: &Config) -> Result<PgPool, BoxError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected, migrations applied"
    );

    Ok(pool)
}
