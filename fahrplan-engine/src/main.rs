use fahrplan_common::{model::assist::ApiCredential, util::PollInterval};
use fahrplan_engine::engine::{
    Engine,
    store::PostStore,
    sync::{SyncLoop, SyncStatus},
};
use fahrplan_gateway::{client::RemoteGateway, http::HttpGateway, memory::MemoryGateway};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use time::UtcOffset;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("POLL_INTERVAL_SECONDS must not be zero")]
    ZeroPollInterval,
    #[error("UTC_OFFSET_HOURS is out of range: {0}")]
    UtcOffsetOutOfRange(i8),
    #[error("Error building the HTTP gateway: {0}")]
    Gateway(#[from] fahrplan_gateway::client::GatewayError),
    #[error("Error waiting for the shutdown signal: {0}")]
    Signal(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    remote_base_url: Option<String>,
    poll_interval_seconds: Option<u64>,
    ai_api_key: Option<String>,
    utc_offset_hours: Option<i8>,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fahrplan_engine=debug,fahrplan_gateway=debug,fahrplan_common=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let poll_interval = match env.poll_interval_seconds {
        Some(seconds) => PollInterval::new(Duration::from_secs(seconds))
            .ok_or(InitError::ZeroPollInterval)?,
        None => PollInterval::default(),
    };
    let calendar_offset = match env.utc_offset_hours {
        Some(hours) => UtcOffset::from_hms(hours, 0, 0)
            .map_err(|_| InitError::UtcOffsetOutOfRange(hours))?,
        None => UtcOffset::UTC,
    };
    let credential = env.ai_api_key.and_then(ApiCredential::new);
    if credential.is_none() {
        info!("No AI credential configured; assist features use local substitutes");
    }

    let gateway: Arc<dyn RemoteGateway> = match &env.remote_base_url {
        Some(base_url) => {
            info!(%base_url, "Using the HTTP gateway");
            Arc::new(HttpGateway::new(base_url.clone())?)
        }
        None => {
            warn!("REMOTE_BASE_URL is not set; running against the in-memory gateway");
            Arc::new(MemoryGateway::new())
        }
    };

    let store = PostStore::new(calendar_offset);
    let cancel = CancellationToken::new();
    let (sync_loop, sync_handle) = SyncLoop::new(
        Arc::clone(&gateway),
        store.clone(),
        poll_interval,
        cancel.clone(),
    );
    let engine = Engine::new(gateway, store, credential, sync_handle.clone());

    info!(interval = ?poll_interval.get(), "Starting the sync loop");
    let loop_task = tokio::spawn(sync_loop.run());

    let mut status_rx = sync_handle.watch();
    let status_task = tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = status_rx.borrow_and_update().clone();
            match status {
                SyncStatus::Syncing => debug!("Sync running"),
                SyncStatus::Idle => debug!("Sync idle"),
                SyncStatus::Failed(failure) => {
                    warn!(kind = %failure.kind, message = %failure.message, "Sync degraded");
                }
            }
        }
    });

    match engine.dashboard_summary().await {
        Ok(summary) => info!(
            published = summary.counts.published,
            scheduled = summary.counts.scheduled,
            failed = summary.counts.failed,
            provenance = %summary.insight.provenance,
            insight = %summary.insight.narrative,
            "Dashboard summary"
        ),
        Err(error) => warn!(%error, "Could not build the dashboard summary"),
    }

    tokio::signal::ctrl_c().await.map_err(InitError::Signal)?;
    info!("Shutting down");
    cancel.cancel();
    let _ = loop_task.await;
    let _ = status_task.await;

    Ok(())
}
