//! Database operations for the API `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Credentials (unique on `user_id` and `login`)
//! - `categories`, `brands`, `products`, `stocks` - Catalog
//! - `stores`, `staffs`, `customers` - Organisation and customers
//! - `orders`, `order_items` - Sales
//! - `codes` - Discount codes
//!
//! The schema lives in `crates/api/migrations/`. It is applied by the
//! database test harness and by operators; the service never migrates on
//! startup.
//!
//! Every repository call is one statement against the pool. Dropping the
//! returned future (client disconnect, request deadline) aborts the query.

pub mod entities;
pub mod orders;
pub mod repository;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use repository::{Assignments, Entity, Repository, SqlValue};
pub use users::{UserKey, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique login).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Input rejected by the store (foreign key or check constraint).
    #[error("invalid input: {0}")]
    Validation(String),
}

/// Classify a write failure by the constraint it violated.
pub(crate) fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(constraint);
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Validation(format!("referenced row missing ({constraint})"));
        }
        if db_err.is_check_violation() {
            return RepositoryError::Validation(format!("check failed ({constraint})"));
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
