//! Backend entry-point: loads settings, prepares storage and serves the
//! wishlist API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;
use std::path::Path;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use wishlist_backend::inbound::http::health::HealthState;
use wishlist_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// `Key::derive_from` needs at least this much master key material.
const MIN_SESSION_KEY_BYTES: usize = 32;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let key = load_session_key(
        settings.session_key_file(),
        settings.allow_ephemeral_session_key,
    )?;
    let bind_addr = settings.bind_addr()?;
    require_storage(settings.database_url.as_deref(), cfg!(debug_assertions))?;
    let mut config = ServerConfig::new(key, settings.cookie_secure, SameSite::Lax, bind_addr);

    if let Some(database_url) = settings.database_url.as_deref() {
        if settings.run_migrations {
            run_pending_migrations(database_url)
                .await
                .map_err(io::Error::other)?;
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    health_state.mark_ready();
    info!(%bind_addr, "wishlist backend listening");

    let result = server.await;
    health_state.mark_draining();
    result
}

/// In-memory storage starts with no users, so release builds insist on a
/// database.
fn require_storage(database_url: Option<&str>, allow_in_memory: bool) -> io::Result<()> {
    match database_url {
        Some(_) => Ok(()),
        None if allow_in_memory => {
            warn!("no database configured; using in-memory storage (dev only)");
            Ok(())
        }
        None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "WISHLIST_DATABASE_URL must be set in release builds",
        )),
    }
}

/// Read the session signing key, or generate a throwaway one in debug
/// builds or when explicitly allowed.
fn load_session_key(path: &Path, allow_ephemeral: bool) -> io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() >= MIN_SESSION_KEY_BYTES => Ok(Key::derive_from(&bytes)),
        Ok(bytes) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "session key at {} has {} bytes; at least {MIN_SESSION_KEY_BYTES} required",
                path.display(),
                bytes.len()
            ),
        )),
        Err(e) if cfg!(debug_assertions) || allow_ephemeral => {
            warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(e) => Err(io::Error::other(format!(
            "failed to read session key at {}: {e}",
            path.display()
        ))),
    }
}
