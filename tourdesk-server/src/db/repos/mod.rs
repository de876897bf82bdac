//! Repository implementations over the data-access gateway
//!
//! Each repository follows these patterns:
//! - Existence check by natural key before every write
//! - One gateway call per statement, no transactions

pub mod entity;
pub mod groups;

pub use entity::{Audit, EntityRepo, DEFAULT_ACTOR_ID};
pub use groups::GroupRepo;
