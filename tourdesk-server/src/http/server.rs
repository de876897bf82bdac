//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::legacy_status;
use super::routes;
use crate::catalog::Catalog;
use crate::db::{Audit, Gateway, DEFAULT_ACTOR_ID};

/// Default listen address
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
    8000,
);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Answer NotFound, Conflict and KeyMismatch all with 404
    pub legacy_status: bool,

    /// Actor id stamped into audit columns
    pub actor_id: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND,
            legacy_status: false,
            actor_id: DEFAULT_ACTOR_ID,
        }
    }
}

/// Shared application state, immutable after startup
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub catalog: Catalog,
    pub audit: Audit,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>, catalog: Catalog, audit: Audit) -> Self {
        Self {
            gateway,
            catalog,
            audit,
        }
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, legacy: bool) -> Router {
    let mut app = Router::new()
        .merge(routes::health::router())
        .merge(routes::customers::router())
        .merge(routes::groups::router())
        .merge(routes::locations::router())
        .merge(routes::currencies::router())
        .merge(routes::enrollments::router());

    if legacy {
        app = app.layer(middleware::map_response(legacy_status));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let gateway = Arc::new(PgGateway::new(pool));
/// run_server(gateway, Catalog::default(), ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    gateway: Arc<dyn Gateway>,
    catalog: Catalog,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let audit = Audit {
        actor_id: config.actor_id,
    };
    if config.legacy_status {
        tracing::warn!("Legacy status codes enabled - conflicts and key mismatches answer 404");
    }

    let app = build_router(AppState::new(gateway, catalog, audit), config.legacy_status);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::db::MemoryGateway;
    use crate::http::testing::send;

    fn app(legacy: bool) -> Router {
        let state = AppState::new(
            Arc::new(MemoryGateway::new()),
            Catalog::default(),
            Audit::default(),
        );
        build_router(state, legacy)
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(!config.legacy_status);
        assert_eq!(config.actor_id, 6);
    }

    #[tokio::test]
    async fn duplicate_create_is_409_by_default() {
        let app = app(false);
        let body = json!({"地點": "台南"});
        send(&app, "POST", "/location/", Some(body.clone())).await;

        let (status, _) = send(&app, "POST", "/location/", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn legacy_mode_answers_404() {
        let app = app(true);
        let body = json!({"地點": "台南"});
        let (status, _) = send(&app, "POST", "/location/", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "POST", "/location/", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "conflict");

        let (status, _) = send(&app, "GET", "/locations/", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
