//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, database connections, default seeding and the
//! Axum server lifecycle.

use crate::application::services::DEFAULT_REFERRAL_CODES;
use crate::config::Config;
use crate::domain::repositories::ReferralCodeRepository;
use crate::infrastructure::persistence::{
    InMemoryReferralCodeRepository, PgReferralCodeRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens a PostgreSQL pool with the configured limits and applies migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_database(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Builds the referral code store selected by the configuration.
///
/// Returns the repository together with a short name for health reporting.
///
/// # Errors
///
/// Returns an error if the database is configured but unreachable.
pub async fn build_repository(
    config: &Config,
) -> Result<(Arc<dyn ReferralCodeRepository>, &'static str)> {
    if let Some(database_url) = &config.database_url {
        let pool = connect_database(config, database_url).await?;
        let repository: Arc<dyn ReferralCodeRepository> = Arc::new(
            PgReferralCodeRepository::new(Arc::new(pool)).with_top_limit(config.top_codes_limit),
        );
        Ok((repository, "postgres"))
    } else {
        tracing::warn!("No database configured, referral codes are kept in memory only");
        let repository: Arc<dyn ReferralCodeRepository> =
            Arc::new(InMemoryReferralCodeRepository::new().with_top_limit(config.top_codes_limit));
        Ok((repository, "memory"))
    }
}

/// Seeds the default referral codes and logs the outcome.
///
/// # Errors
///
/// Returns an error if the store rejects a read or write.
pub async fn bootstrap(state: &AppState) -> Result<()> {
    let created = state
        .referral_code_service
        .seed_defaults()
        .await
        .context("Failed to seed default referral codes")?;

    tracing::info!(created, "Default referral codes initialized");
    for (code, owner_name) in DEFAULT_REFERRAL_CODES {
        tracing::info!("  - {} ({})", code, owner_name);
    }

    Ok(())
}

/// Builds the application state and seeds defaults when `seed_defaults` is set.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or seeding fails.
pub async fn prepare_state(config: &Config) -> Result<AppState> {
    let (repository, storage) = build_repository(config).await?;
    let state = AppState::new(repository, storage);

    if config.seed_defaults {
        bootstrap(&state).await?;
    }

    Ok(state)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or the in-memory store
/// - Default referral codes (unless `SEED_DEFAULTS=false`)
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Seeding fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = prepare_state(&config).await?;
    let app = app_router(state);

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

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_config(seed_defaults: bool) -> Config {
        Config {
            database_url: None,
            listen_addr: "127.0.0.1:0".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            top_codes_limit: 10,
            seed_defaults,
            db_max_connections: 10,
            db_connect_timeout: 30,
            db_idle_timeout: 600,
            db_max_lifetime: 1800,
        }
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let state = prepare_state(&in_memory_config(false)).await.unwrap();

        bootstrap(&state).await.unwrap();
        bootstrap(&state).await.unwrap();

        let codes = state.referral_code_service.list_all().await.unwrap();
        assert_eq!(codes.len(), DEFAULT_REFERRAL_CODES.len());
        assert!(codes.iter().all(|rc| rc.is_active && rc.usage_count == 0));
    }

    #[tokio::test]
    async fn test_prepare_state_seeds_when_enabled() {
        let state = prepare_state(&in_memory_config(true)).await.unwrap();

        assert_eq!(state.storage, "memory");
        let stats = state.referral_code_service.statistics().await.unwrap();
        assert_eq!(stats.total_codes, 7);
        assert!(
            state
                .referral_code_service
                .is_valid("riddhima226100")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_prepare_state_skips_seeding_when_disabled() {
        let state = prepare_state(&in_memory_config(false)).await.unwrap();

        let stats = state.referral_code_service.statistics().await.unwrap();
        assert_eq!(stats.total_codes, 0);
    }
}
