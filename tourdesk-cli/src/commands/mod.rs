//! Command implementations for the tourdesk CLI

pub mod config;
pub mod serve;

pub use config::run_config;
pub use serve::run_serve;
