//! # Scholaris DB
//!
//! PostgreSQL connection pool setup and migrations.
//!
//! # Example
//!
//! ```ignore
//! use scholaris_config::DatabaseConfig;
//! use scholaris_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//!     scholaris_db::run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

use anyhow::Context;
use scholaris_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a pool using `config`.
///
/// Fails when `DATABASE_URL` is unset or the database is unreachable.
pub async fn init_db_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let url = config
        .url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    info!(max_connections = config.max_connections, "Database pool initialized");

    Ok(pool)
}

/// Applies the migrations embedded from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(())
}
