//! roll-call server entry point.
//!
//! Starts the Axum HTTP server with the roster REST endpoints.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use roll_call::api;
use roll_call::app_state::AppState;
use roll_call::config::{LogFormat, RosterConfig};
use roll_call::domain::{InMemoryStore, RosterStore};
use roll_call::persistence::postgres::PostgresStore;
use roll_call::persistence::schema;
use roll_call::service::RosterService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = RosterConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting roll-call");

    // Build storage
    let store: Arc<dyn RosterStore> = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(config.connect_timeout())
            .connect(&config.database_url)
            .await?;
        schema::ensure_schema(&pool).await?;
        tracing::info!(
            max_connections = config.database_max_connections,
            "connected to postgres"
        );
        Arc::new(PostgresStore::new(pool))
    } else {
        tracing::warn!("persistence disabled; roster is kept in memory only");
        Arc::new(InMemoryStore::new())
    };

    // Build service layer and router
    let roster_service = RosterService::new(store, config.history_limit);
    let app = api::build_app(AppState::new(roster_service));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::warn!("received ctrl-c, shutting down"),
        () = terminate => tracing::warn!("received SIGTERM, shutting down"),
    }
}
