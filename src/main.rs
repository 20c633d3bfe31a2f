//! Promotion analytics relay.
//!
//! Reads newline-delimited JSON tracking commands from stdin and records
//! each one against the hosted tables:
//! - `{"kind":"interaction","promotionId":"p1","promotionType":"artist","eventType":"click"}`
//! - `{"kind":"content_view","contentId":"c1","userId":"u1"}`
//!
//! The process lifetime is one session. Writes are fire-and-forget;
//! outstanding ones are awaited on EOF or Ctrl+C before exiting.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use promo_core::MemorySessionStorage;
use store_client::{health::check_connection, RestStore};
use telemetry::{init_tracing_from_env, metrics};
use tracker::{EventTracker, TrackContentView, TrackInteraction, TrackOutcome, TrackerConfig};

/// One line of input.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Command {
    Interaction(TrackInteraction),
    ContentView(TrackContentView),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting promo-tracker v{}", env!("CARGO_PKG_VERSION"));

    let config = TrackerConfig::load().context("Failed to load configuration")?;

    let store = RestStore::new(config.store.clone()).context("Failed to create store client")?;

    if check_connection(&store).await {
        info!("Store connection: healthy");
    } else {
        // Keep going: tracking is best-effort and the store may come back
        warn!("Store connection: unhealthy, events may be dropped");
    }

    let storage = MemorySessionStorage::new();
    let tracker = EventTracker::for_session(Arc::new(store), &storage, config.environment());
    info!(session_hash = %tracker.session().hash(), "Session started");

    let mut in_flight: Vec<JoinHandle<TrackOutcome>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no: u64 = 0;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    line_no += 1;
                    if let Some(handle) = dispatch(&tracker, line_no, &line) {
                        in_flight.push(handle);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            },
            _ = &mut shutdown => break,
        }

        in_flight.retain(|handle| !handle.is_finished());
    }

    info!(pending = in_flight.len(), "Waiting for outstanding writes");
    for handle in in_flight {
        if let Err(e) = handle.await {
            error!("Tracking task failed: {}", e);
        }
    }

    let snapshot = metrics().snapshot();
    info!(
        interactions_recorded = snapshot.interactions_recorded,
        interactions_dropped = snapshot.interactions_dropped,
        content_views_recorded = snapshot.content_views_recorded,
        content_views_dropped = snapshot.content_views_dropped,
        store_latency_mean_ms = snapshot.store_latency_mean_ms,
        "Shutdown complete"
    );
    Ok(())
}

/// Parses one input line and fires the matching write.
fn dispatch(tracker: &EventTracker, line_no: u64, line: &str) -> Option<JoinHandle<TrackOutcome>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str::<Command>(line) {
        Ok(Command::Interaction(input)) => Some(tracker.spawn_interaction(input)),
        Ok(Command::ContentView(input)) => Some(tracker.spawn_content_view(input)),
        Err(e) => {
            warn!(line = line_no, error = %e, "Skipping malformed command");
            None
        }
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
