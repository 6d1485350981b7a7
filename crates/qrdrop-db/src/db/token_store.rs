use qrdrop_core::{UploadSession, UploadToken};
use std::collections::HashMap;

/// Issued upload sessions keyed by token.
///
/// Holds no lock of its own; callers reach it only through [`crate::HandoffStore`].
#[derive(Debug, Default)]
pub struct TokenStore {
    sessions: HashMap<UploadToken, UploadSession>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, session: UploadSession) {
        self.sessions.insert(session.token.clone(), session);
    }

    pub fn get(&self, token: &UploadToken) -> Option<&UploadSession> {
        self.sessions.get(token)
    }

    pub fn remove(&mut self, token: &UploadToken) -> Option<UploadSession> {
        self.sessions.remove(token)
    }

    /// Drop every session expired at `now`, returning how many were removed.
    pub fn remove_expired(&mut self, now: chrono::DateTime<chrono::Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
