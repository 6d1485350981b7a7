//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::SignedCookieSession;
use crate::constants::{SERVICE_NAME, SERVICE_VERSION};
use crate::services::{HandoffService, UploadUrlBase};
use crate::state::AppState;
use anyhow::{Context, Result};
use qrdrop_core::{Clock, Config, SystemClock};
use qrdrop_db::{spawn_session_reaper, HandoffStore};
use qrdrop_storage::BlobStore;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    qrdrop_infra::init_telemetry(SERVICE_NAME, SERVICE_VERSION, config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let blob_store = storage::setup_storage(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = build_state(config.clone(), blob_store, clock.clone());

    let reap_secs = config.session_reap_interval_secs();
    if reap_secs > 0 {
        spawn_session_reaper(
            state.handoff.store().clone(),
            clock,
            Duration::from_secs(reap_secs),
        );
        tracing::info!(interval_secs = reap_secs, "Expired upload session reaper started");
    }

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Wire the application state from its collaborators.
pub fn build_state(
    config: Config,
    blob_store: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
) -> Arc<AppState> {
    let url_base = match config.public_base_url() {
        Some(base) => UploadUrlBase::Fixed(base.to_string()),
        None => UploadUrlBase::RequestHost {
            scheme: config.public_scheme().to_string(),
        },
    };

    let handoff = HandoffService::new(
        HandoffStore::new(),
        blob_store,
        clock,
        config.upload_token_ttl(),
        url_base,
    );

    let sessions = Arc::new(SignedCookieSession::new(
        config.session_secret().as_bytes().to_vec(),
        config.session_cookie_name(),
    ));

    Arc::new(AppState {
        config,
        handoff,
        sessions,
    })
}
