//! tourdesk-server: HTTP CRUD service for tour-group bookkeeping
//!
//! Five tables (customers, groups, locations, currencies and group
//! enrollments) are exposed as JSON resources addressed by natural key.
//! Column types come from a compile-time schema refined by a numeric
//! allowlist loaded at startup.
//!
//! # Architecture
//!
//! - `schema` / `config` / `catalog`: declared tables, allowlist, resolved layouts
//! - `models`: validated records, values and natural keys
//! - `db`: gateway trait with Postgres and in-memory backends, repositories
//! - `http`: axum router, handlers and error mapping

pub mod catalog;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod schema;

pub use catalog::{Catalog, Column, Table};
pub use config::{ConfigError, NumericColumns, DEFAULT_NUM_COLS_PATH};
pub use db::{create_pool, create_pool_with_options, Audit, DbError, Gateway, MemoryGateway, PgGateway};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use schema::{Entity, FieldKind};
