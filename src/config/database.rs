//! Database connection pool initialization.
//!
//! The pool is built once at startup from `DATABASE_URL`, shared through
//! [`crate::state::AppState`] for the life of the process, and closed on
//! the shutdown path in `main`. Handlers never open their own connections.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

/// Initializes the PostgreSQL connection pool.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the database is unreachable;
/// there is no degraded mode without a store.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
