use crate::db::{ImageRegistry, TokenStore};
use chrono::{DateTime, Utc};
use qrdrop_core::{UploadSession, UploadToken, UploadedImage};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// What a submit attempt found when it looked the token up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitCheck {
    /// Present and not yet expired; the session is returned by value.
    Live(UploadSession),
    /// Never issued, or already consumed.
    Absent,
    /// Present but expired. The entry has already been removed.
    Expired,
}

/// Sizes of the in-memory maps, for readiness reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub pending_tokens: usize,
    pub images: usize,
}

#[derive(Debug, Default)]
struct HandoffState {
    tokens: TokenStore,
    images: ImageRegistry,
}

/// Token store and image registry behind a single lock.
///
/// Every method takes the lock once and holds it only for map operations. No
/// method performs I/O while holding it.
#[derive(Clone, Default)]
pub struct HandoffStore {
    inner: Arc<Mutex<HandoffState>>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly issued session.
    pub async fn insert(&self, session: UploadSession) {
        let mut state = self.inner.lock().await;
        state.tokens.put(session);
    }

    /// Whether the token is currently stored. Expiry is not consulted.
    pub async fn contains(&self, token: &UploadToken) -> bool {
        let state = self.inner.lock().await;
        state.tokens.get(token).is_some()
    }

    /// Classify a token for a submit at `now`.
    ///
    /// An expired entry is removed in the same critical section that observed it.
    pub async fn check_submit(&self, token: &UploadToken, now: DateTime<Utc>) -> SubmitCheck {
        let mut state = self.inner.lock().await;
        match state.tokens.get(token) {
            None => SubmitCheck::Absent,
            Some(session) if session.is_expired_at(now) => {
                state.tokens.remove(token);
                SubmitCheck::Expired
            }
            Some(session) => SubmitCheck::Live(session.clone()),
        }
    }

    /// Consume the token and record the stored image for its owner.
    ///
    /// Returns `None` when the token is no longer present, in which case nothing
    /// is recorded. Only presence is checked: an upload that started while the
    /// token was live may finish after `expires_at`.
    pub async fn complete_upload(&self, token: &UploadToken, url: String) -> Option<UploadedImage> {
        let mut state = self.inner.lock().await;
        let session = state.tokens.remove(token)?;
        let image = UploadedImage::new(session.owner_user_id, url);
        state.images.append(session.owner_user_id, image.clone());
        Some(image)
    }

    pub async fn list_images(&self, owner_user_id: Uuid) -> Vec<UploadedImage> {
        let state = self.inner.lock().await;
        state.images.list_for(owner_user_id)
    }

    /// Remove every session expired at `now`.
    pub async fn reap_expired(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.inner.lock().await;
        state.tokens.remove_expired(now)
    }

    pub async fn counts(&self) -> StoreCounts {
        let state = self.inner.lock().await;
        StoreCounts {
            pending_tokens: state.tokens.len(),
            images: state.images.total(),
        }
    }
}
