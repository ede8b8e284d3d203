//! Process entry point (C9): wires C1 (identity), C4 (session store), C5
//! (connection registry), and C7 (record sink) into the shared `AppState`,
//! builds the router (C8), and serves it with graceful shutdown —
//! grounded on `run_server<C>` (`src/server/bootstrap.rs`), with the
//! curve-generic shuffler bootstrap dropped entirely.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::identity::IdentityVerifier;
use crate::record_sink::{NullRecordSink, RecordSink};
use crate::session::{SessionStore, SessionStoreConfig};
use crate::transport::ConnectionRegistry;

use super::app::AppState;
use super::routes::build_router;

const LOG_TARGET: &str = "server::bootstrap";

pub type ServerConfig = CliConfig;

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let record_sink: Arc<dyn RecordSink> = match &config.record_sink_url {
        Some(database_url) => {
            let db = crate::db::connect_to_postgres_db(database_url)
                .await
                .context("failed to connect record sink database")?;
            info!(target: LOG_TARGET, "record sink connected to postgres");
            Arc::new(crate::db::SeaOrmRecordSink::new(db))
        }
        None => {
            warn!(
                target: LOG_TARGET,
                "RECORD_SINK_URL not set, action log will be discarded"
            );
            Arc::new(NullRecordSink)
        }
    };

    let sessions = Arc::new(SessionStore::new(
        Arc::clone(&record_sink),
        SessionStoreConfig {
            room_queue_capacity: config.room_queue_capacity,
            room_grace_period: Duration::from_secs(config.room_grace_period_secs),
        },
    ));

    let state = Arc::new(AppState {
        sessions,
        identity: Arc::new(IdentityVerifier::new(&config.jwt_secret)),
        connections: Arc::new(ConnectionRegistry::new()),
        record_sink,
        config,
    });

    let bind: SocketAddr = ([0, 0, 0, 0], state.config.port).into();
    let router = build_router(Arc::clone(&state));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    let local_addr = listener.local_addr()?;
    info!(target: LOG_TARGET, %local_addr, "cockroach poker server listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target: LOG_TARGET, %err, "failed to install ctrl-c handler");
    }
    info!(target: LOG_TARGET, "shutdown signal received");
}
