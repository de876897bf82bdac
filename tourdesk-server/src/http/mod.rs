//! HTTP server layer
//!
//! Axum server with:
//! - Permissive CORS
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ApiError, ErrorKind};
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError, DEFAULT_BIND};
