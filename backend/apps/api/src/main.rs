//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request handling errors are the
//! domain crates' own types.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::application::{ProvisionOutcome, ProvisionSuperuserUseCase};
use auth::domain::repository::AuthSessionRepository;
use auth::PgAuthRepository;
use ballot::{BallotAppState, PgBallotRepository, ballot_router};
use platform::rate_limit::MemoryCounterStore;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

/// How often expired rate limit counters are dropped
const COUNTER_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,ballot=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_repo = Arc::new(PgAuthRepository::new(pool.clone()));
    let ballot_repo = Arc::new(PgBallotRepository::new(pool.clone()));
    let auth_config = Arc::new(config.auth);

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(
                sessions_deleted = sessions,
                "Auth session cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }

    // The administrator account must exist before serving
    let provision =
        ProvisionSuperuserUseCase::new(auth_repo.clone(), auth_repo.clone(), auth_config.clone());
    match provision
        .execute(&config.root_username, config.root_password)
        .await
        .context("Superuser provisioning failed")?
    {
        ProvisionOutcome::Created(user) => {
            tracing::info!(user_name = %user.user_name, "Superuser provisioned");
        }
        ProvisionOutcome::AlreadyExists(user) => {
            tracing::info!(user_name = %user.user_name, "Superuser already present");
        }
    }

    // Rate limit counters live in process memory
    let counter_store = Arc::new(MemoryCounterStore::new());
    let sweep_store = counter_store.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(COUNTER_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = sweep_store.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Expired rate limit counters purged");
            }
        }
    });

    // Build router
    let state = BallotAppState::new(
        auth_repo,
        ballot_repo,
        auth_config,
        Arc::new(config.ballot),
    );
    let app = ballot_router(state, counter_store).layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
