//! Backend entry-point: loads configuration, runs migrations, and serves HTTP.

use std::sync::Arc;

use actix_web::cookie::Key;
use diesel::pg::PgConnection;
use diesel::prelude::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{AppConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::load()
        .map_err(|e| std::io::Error::other(format!("configuration failed to load: {e}")))?;

    let key = load_session_key(&config)?;

    run_migrations(config.database_url.clone()).await?;

    let pool = DbPool::new(
        PoolConfig::new(&config.database_url).with_max_size(config.db_max_connections),
    )
    .await
    .map_err(|e| std::io::Error::other(format!("database pool construction: {e}")))?;

    let health_state = HealthState::new();
    let server = create_server(Arc::clone(&health_state), &config, pool, key)?;

    health_state.set_ready(true);
    info!("server started");
    server.await
}

/// Derive the session key from the configured key file.
///
/// Debug builds, or `APP_SESSION_ALLOW_EPHEMERAL=1`, fall back to an
/// ephemeral key so local development does not need secret material.
/// Release builds without key material refuse to start.
fn load_session_key(config: &AppConfig) -> std::io::Result<Key> {
    let key_path = config.session_key_file();
    match std::fs::read(key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev =
                std::env::var("APP_SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Apply pending schema migrations over a blocking connection.
///
/// The migration harness is synchronous, so this runs on the blocking
/// thread pool before the async pool is built.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|e| std::io::Error::other(format!("database connection: {e}")))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
        info!(count = applied.len(), "migrations applied");
        Ok(())
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task panicked: {e}")))?
}
