// Bootstrap utilities shared by the service binaries

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{middleware::from_fn_with_state, Router};
use sqlx::migrate::Migrator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::auth::JwtService;
use crate::config::Settings;
use crate::db::DbPool;
use crate::middleware::{auth_middleware, request_logging, AccessPolicy, RequestFilter};
use crate::telemetry;

/// Load settings for `service` and start logging.
pub fn init(service: &str) -> Result<Settings> {
    let settings = Settings::load(service).context("Failed to load configuration")?;
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    telemetry::init_logging(
        &settings.observability.log_level,
        settings.observability.json_logs,
    )?;
    info!(
        service = service,
        host = %settings.server.host,
        port = settings.server.port,
        "Configuration loaded"
    );
    Ok(settings)
}

/// Open the pool and apply `migrator` when migrations are enabled.
#[tracing::instrument(skip(settings, migrator))]
pub async fn init_database_pool(settings: &Settings, migrator: &Migrator) -> Result<DbPool> {
    info!("Initializing database pool");

    let db_pool = DbPool::new(&settings.database)
        .await
        .context("Failed to initialize database pool")?;

    if settings.database.run_migrations {
        db_pool
            .migrate(migrator)
            .await
            .context("Failed to run database migrations")?;
    } else {
        info!("Database migrations skipped");
    }

    Ok(db_pool)
}

/// Wrap `router` in the request filter, request logging, tracing, CORS and timeout layers.
pub fn apply_layers(
    router: Router,
    settings: &Settings,
    service: &'static str,
    policy: AccessPolicy,
) -> Router {
    let filter = RequestFilter::new(JwtService::from_config(&settings.auth), policy);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(from_fn_with_state(filter, auth_middleware))
        .layer(from_fn_with_state(service, request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            settings.server.request_timeout_seconds,
        )))
}

/// Bind and serve until Ctrl-C or SIGTERM.
pub async fn serve(router: Router, settings: &Settings) -> Result<()> {
    let addr = SocketAddr::from((
        settings
            .server
            .host
            .parse::<std::net::IpAddr>()
            .context("Invalid server host")?,
        settings.server.port,
    ));
    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown");
}
