//! PostgreSQL persistence for the Stryv progress engine.
//!
//! - [`models`] — `FromRow` entity structs and create DTOs.
//! - [`repositories`] — zero-sized repos with async CRUD methods over
//!   `&PgPool`.
//! - [`store`] — the [`PgStore`] implementation of the engine's
//!   `ProgressStore` collaborator trait.
//! - [`config`] — environment-driven connection configuration.

pub mod config;
pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use config::DbConfig;
pub use store::PgStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from configuration.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
