//! Postgres pool for `PgGateway`
//!
//! Gateway calls never hold a connection across statements, so a small pool
//! serves many concurrent requests. Requests queue for at most
//! `ACQUIRE_TIMEOUT` before failing with a 500.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// `serve --max-connections` default.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pool with [`DEFAULT_MAX_CONNECTIONS`].
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Pool of at most `max_connections` (a zero is raised to one); connects
/// eagerly so a bad `DATABASE_URL` fails at startup.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}
