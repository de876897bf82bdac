//! HTTP server command
//!
//! Loads the numeric column allowlist, connects the gateway and runs the
//! API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use tourdesk_server::db::{create_pool_with_options, Gateway, MemoryGateway, PgGateway};
use tourdesk_server::db::{DEFAULT_ACTOR_ID, DEFAULT_MAX_CONNECTIONS};
use tourdesk_server::http::{run_server, ServerConfig};
use tourdesk_server::{Catalog, NumericColumns};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "TOURDESK_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Database URL (postgres://...)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Numeric column allowlist (default: ./num_cols.json if present)
    #[arg(long, env = "TOURDESK_NUM_COLS", value_name = "PATH")]
    pub num_cols: Option<PathBuf>,

    /// Schema qualifying every table name
    #[arg(long, env = "TOURDESK_DB_SCHEMA")]
    pub db_schema: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Actor id written to audit columns
    #[arg(long, env = "TOURDESK_ACTOR_ID", default_value_t = DEFAULT_ACTOR_ID)]
    pub actor_id: i64,

    /// Answer not-found, conflict and key-mismatch errors all with 404
    #[arg(long)]
    pub legacy_status: bool,

    /// Keep tables in memory instead of connecting to a database
    #[arg(long)]
    pub in_memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let numeric = NumericColumns::load_or_default(args.num_cols.as_deref())
        .context("Failed to load numeric column allowlist")?;
    let catalog = Catalog::new(&numeric);

    let gateway: Arc<dyn Gateway> = if args.in_memory {
        if args.database_url.is_some() {
            tracing::warn!("--in-memory given, ignoring DATABASE_URL");
        }
        tracing::warn!("Using in-memory tables - data is lost on shutdown");
        Arc::new(MemoryGateway::new())
    } else {
        let database_url = args
            .database_url
            .as_deref()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env (or use --in-memory)")?;

        let pool = create_pool_with_options(database_url, args.max_connections)
            .await
            .context("Failed to create database pool")?;
        tracing::info!(max_connections = args.max_connections, "Database pool ready");

        Arc::new(PgGateway::new(pool).with_schema(args.db_schema.clone()))
    };

    let config = ServerConfig {
        bind_addr: args.bind,
        legacy_status: args.legacy_status,
        actor_id: args.actor_id,
    };

    tracing::info!("Starting tourdesk server on {}", args.bind);

    // Run server (blocks until shutdown)
    run_server(gateway, catalog, config)
        .await
        .context("Server error")?;

    Ok(())
}
