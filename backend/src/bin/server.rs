//! Tour booking HTTP server.
//!
//! Loads `booking.toml` (falling back to environment variables), builds the
//! repository and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # In-memory repository (default)
//! cargo run --bin tour-booking-server
//!
//! # Managed backend
//! REPOSITORY_TYPE=remote BOOKING_REMOTE_URL=https://project.example.co \
//!   BOOKING_REMOTE_KEY=... cargo run --bin tour-booking-server --features remote-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `remote`
//! - `BOOKING_REMOTE_URL`, `BOOKING_REMOTE_KEY`: managed backend connection
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tour_booking::db::{self, RepositoryConfig};
use tour_booking::http::{create_router, AppState};
use tour_booking::session::SessionRegistry;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting tour booking server");

    let config = match RepositoryConfig::from_default_location() {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using defaults", e);
            RepositoryConfig::default()
        }
    }
    .with_env_overrides();

    let repository = Arc::clone(db::init_repository(&config)?);
    info!(
        "Repository initialized ({})",
        config.repository.repo_type
    );

    let sessions = SessionRegistry::new(config.session_ttl());
    spawn_session_sweeper(sessions.clone());

    let state = AppState::with_sessions(repository, sessions);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop expired sessions from the registry.
fn spawn_session_sweeper(sessions: SessionRegistry) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                info!("Purged {} expired sessions", purged);
            }
        }
    });
}
