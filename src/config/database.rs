//! Database configuration and connection pool initialization.
//!
//! Reads the PostgreSQL connection string from `DATABASE_URL` and creates
//! a SQLx connection pool. The pool is cheaply cloneable and is placed in
//! the application state for use in request handlers.

use sqlx::PgPool;
use std::env;

/// Initializes a PostgreSQL connection pool.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the connection fails. This runs
/// once at startup, before the server begins accepting requests.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
