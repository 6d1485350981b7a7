//! Blob store setup

use anyhow::Result;
use qrdrop_core::Config;
use qrdrop_storage::{create_storage, BlobStore};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!(backend = %config.storage_backend(), "Initializing blob store...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = ?storage.backend_type(),
        "Blob store initialized successfully"
    );
    Ok(storage)
}
