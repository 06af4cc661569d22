//! Roster Database Crate
//!
//! The record store behind the user handlers: the `User` entity, the
//! [`UserStore`] trait, a SQLite implementation with its migrations, and an
//! in-memory implementation.

use roster_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use entities::{User, UserUpdate};
pub use repos::{
    MemoryUserRepository, NameIndexKey, NameQuery, Page, PrimaryKey, ScanFilter, ScanRequest,
    UserRepository, UserStore, NAME_INDEX, TABLE_NAME,
};
pub use types::{StoreError, StoreResult};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> StoreResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| StoreError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| StoreError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
