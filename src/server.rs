//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, outbound clients and the Axum
//! server lifecycle.

use crate::config::Config;
use crate::infrastructure::geocoding::nominatim::NominatimGeocoder;
use crate::infrastructure::persistence::{
    PgClaimRepository, PgSubmissionRepository, PgSubscriptionRepository, PgVenueRepository,
};
use crate::infrastructure::stripe::StripeClient;
use crate::routes::app_router;
use crate::state::{AppState, Gateways, Repositories};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use url::Url;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Billing and geocoding clients
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - An outbound client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);
    let repos = Repositories {
        venues: Arc::new(PgVenueRepository::new(pool.clone())),
        submissions: Arc::new(PgSubmissionRepository::new(pool.clone())),
        claims: Arc::new(PgClaimRepository::new(pool.clone())),
        subscriptions: Arc::new(PgSubscriptionRepository::new(pool.clone())),
    };

    let stripe_base = Url::parse(&config.stripe_api_base).context("Invalid STRIPE_API_BASE")?;
    let geocoder_base = Url::parse(&config.geocoder_url).context("Invalid GEOCODER_URL")?;
    let gateways = Gateways {
        billing: Arc::new(StripeClient::new(
            stripe_base,
            config.stripe_secret_key.clone(),
            config.stripe_webhook_secret.clone(),
        )),
        geocoder: Arc::new(
            NominatimGeocoder::new(geocoder_base, &config.geocoder_user_agent)
                .map_err(|e| anyhow::anyhow!("Failed to build geocoder: {e}"))?,
        ),
    };

    let state = AppState::new(repos, gateways, config.service_settings()?);

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
