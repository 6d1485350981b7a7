use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use qrdrop_core::{Clock, StorageBackend};
use qrdrop_storage::{BlobStore, StorageError, StorageResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Base URL of stored mock objects.
pub const MOCK_CDN_URL: &str = "https://cdn.test";

/// Blob store that records calls and can be switched into failure mode.
#[derive(Default)]
pub struct MockBlobStore {
    fail: AtomicBool,
    calls: AtomicUsize,
    delay: Option<std::time::Duration>,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every store call sleeps for `delay` before answering.
    pub fn with_delay(delay: std::time::Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn store(
        &self,
        owner_user_id: uuid::Uuid,
        filename: &str,
        _content_type: &str,
        _data: Bytes,
    ) -> StorageResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::UpstreamStatus {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(format!(
            "{}/{}/{}-{}",
            MOCK_CDN_URL, owner_user_id, call, filename
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Uploadcare
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .expect("valid start time");
        Self {
            now: Mutex::new(start),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}
