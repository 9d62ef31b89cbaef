//! LocalConnect server entry point.

mod server;
mod settings;

use std::path::Path;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroize;

#[cfg(feature = "example-data")]
use localconnect::example_data::{ExampleDataSettings, seed_example_data_on_startup};
use localconnect::inbound::http::gateway::GatewayVerifier;
use localconnect::inbound::http::health::HealthState;
use localconnect::outbound::persistence::{DbPool, PoolConfig, migrate};

use server::{ServerConfig, SessionCookie, create_server};
use settings::AppSettings;

/// Short, non-reversible identifier for the active session key.
fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.master());
    hex::encode(&digest[..8])
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let key = Key::try_derive_from(&bytes)
                .map_err(|err| eyre!("session key at {} is unusable: {err}", path.display()));
            bytes.zeroize();
            key
        }
        Err(error) if allow_ephemeral || cfg!(debug_assertions) => {
            warn!(path = %path.display(), %error, "using ephemeral session key");
            Ok(Key::generate())
        }
        Err(error) => {
            Err(error).wrap_err_with(|| format!("failed to read session key at {}", path.display()))
        }
    }
}

/// Verifier for gateway-signed logins; refuses every login without a secret.
fn load_gateway(path: Option<&Path>) -> Result<GatewayVerifier> {
    let Some(path) = path else {
        warn!("no gateway secret configured; logins are refused");
        return Ok(GatewayVerifier::disabled());
    };
    let mut bytes = std::fs::read(path)
        .wrap_err_with(|| format!("failed to read gateway secret at {}", path.display()))?;
    while bytes.last().is_some_and(u8::is_ascii_whitespace) {
        bytes.pop();
    }
    let gateway = GatewayVerifier::new(bytes, Arc::new(DefaultClock))
        .map_err(|err| eyre!("gateway secret at {} is unusable: {err}", path.display()))?;
    info!(path = %path.display(), "gateway secret loaded");
    Ok(gateway)
}

async fn connect_database(settings: &AppSettings) -> Result<Option<DbPool>> {
    let Some(url) = settings.database_url.clone() else {
        warn!("no database configured; serving fixture data only");
        return Ok(None);
    };

    if settings.run_migrations() {
        let applied = migrate(url.clone()).await.wrap_err("database migrations failed")?;
        info!(applied, "database migrations applied");
    }

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_pool_size()))
        .await
        .wrap_err("failed to build database pool")?;
    let status = pool.status();
    info!(connections = status.connections, idle = status.idle, "database pool ready");
    Ok(Some(pool))
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        eprintln!("tracing init failed: {error}");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let key = load_session_key(&settings.session_key_file(), settings.allow_ephemeral_key)?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");
    let gateway = load_gateway(settings.gateway_secret_file.as_deref())?;

    let db_pool = connect_database(&settings).await?;

    #[cfg(feature = "example-data")]
    {
        let seeding = ExampleDataSettings::load().wrap_err("failed to load example data settings")?;
        seed_example_data_on_startup(&seeding, db_pool.as_ref())
            .await
            .wrap_err("example data seeding failed")?;
    }

    let session = SessionCookie::new(key, settings.cookie_secure(), settings.same_site()?);
    let mut config = ServerConfig::new(session, settings.bind_addr())
        .with_owner(settings.owner_external_id()?)
        .with_gateway(gateway);
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::default_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(addr = %settings.bind_addr(), "listening");

    let handle = server.handle();
    let shutdown_state = health_state.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            shutdown_state.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    server.await?;
    Ok(())
}
