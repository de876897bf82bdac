//! Database layer - gateway, connection pool and repositories
//!
//! # Design Principles
//!
//! - Connection pool behind the gateway, one checkout per statement
//! - Every value is a bind parameter
//! - Select lists name declared columns only

pub mod gateway;
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod repos;
pub mod sql;

pub use gateway::{DbError, Filter, Gateway};
pub use memory::MemoryGateway;
pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use postgres::PgGateway;
pub use repos::*;
