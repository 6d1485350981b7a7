//! Upload hand-off service
//!
//! Issues tokens, decides whether the hand-off page may be served and drives a
//! submitted upload through the token state machine:
//!
//! | token   | submit outcome                         | token afterwards |
//! |---------|----------------------------------------|------------------|
//! | absent  | 400                                    | absent           |
//! | expired | 400                                    | removed          |
//! | live    | blob stored, image recorded, 200       | removed          |
//! | live    | blob store failed, 500                 | still live       |
//!
//! The blob store is called without holding the store lock. Consumption
//! re-acquires it and succeeds for exactly one caller per token.

use crate::error::{multipart_error_to_app, storage_error_to_app};
use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Duration;
use qrdrop_core::constants::UPLOAD_FILE_FIELD;
use qrdrop_core::{AppError, Clock, IssuedUpload, UploadSession, UploadToken, UploadedImage};
use qrdrop_db::{HandoffStore, SubmitCheck};
use qrdrop_storage::{BlobStore, StorageBackend};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

const DEFAULT_FILENAME: &str = "upload";
const MAX_FILENAME_LEN: usize = 128;
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Where the absolute hand-off URL is rooted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadUrlBase {
    /// `{scheme}://{Host header}`
    RequestHost { scheme: String },
    /// A fixed public origin such as `https://photos.example.com`.
    Fixed(String),
}

impl UploadUrlBase {
    fn origin(&self, host: Option<&str>) -> Result<String, AppError> {
        match self {
            UploadUrlBase::Fixed(base) => Ok(base.trim_end_matches('/').to_string()),
            UploadUrlBase::RequestHost { scheme } => {
                let host = host
                    .map(str::trim)
                    .filter(|h| is_valid_host(h))
                    .ok_or_else(|| {
                        AppError::InvalidInput("Missing or invalid Host header".to_string())
                    })?;
                Ok(format!("{}://{}", scheme, host))
            }
        }
    }
}

/// Host header values we are willing to embed in a URL: hostname or IP with
/// optional port.
fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
}

/// Absent, expired and consumed tokens are indistinguishable to the client.
fn invalid_token(token: &UploadToken) -> AppError {
    AppError::InvalidToken(format!(
        "Upload token {} is invalid or expired",
        token.log_prefix()
    ))
}

/// A file read from the upload form.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Reduce a client-supplied filename to a safe final path component.
pub fn sanitize_filename(raw: Option<&str>) -> String {
    let base = raw
        .unwrap_or_default()
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Read the `file` field out of a multipart body.
///
/// Other fields are skipped. A missing or empty file, or a body that cannot be
/// read (including one over the size limit), is a malformed upload.
pub async fn read_upload(mut multipart: Multipart) -> Result<IncomingFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error_to_app)? {
        if field.name() != Some(UPLOAD_FILE_FIELD) {
            continue;
        }

        let filename = sanitize_filename(field.file_name());
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field.bytes().await.map_err(multipart_error_to_app)?;

        if data.is_empty() {
            return Err(AppError::MalformedUpload(
                "Uploaded file is empty".to_string(),
            ));
        }

        return Ok(IncomingFile {
            filename,
            content_type,
            data,
        });
    }

    Err(AppError::MalformedUpload(format!(
        "Missing multipart field '{}'",
        UPLOAD_FILE_FIELD
    )))
}

#[derive(Clone)]
pub struct HandoffService {
    store: HandoffStore,
    blob_store: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    url_base: UploadUrlBase,
}

impl HandoffService {
    pub fn new(
        store: HandoffStore,
        blob_store: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        url_base: UploadUrlBase,
    ) -> Self {
        Self {
            store,
            blob_store,
            clock,
            ttl,
            url_base,
        }
    }

    pub fn store(&self) -> &HandoffStore {
        &self.store
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.blob_store.backend_type()
    }

    /// Create and store a token for `owner_user_id`.
    ///
    /// `host` is the request's Host header, used unless a fixed public origin
    /// is configured.
    pub async fn issue(
        &self,
        owner_user_id: Uuid,
        host: Option<&str>,
    ) -> Result<IssuedUpload, AppError> {
        let origin = self.url_base.origin(host)?;
        let session = UploadSession::new(owner_user_id, self.clock.now(), self.ttl);
        let issued = IssuedUpload {
            upload_url: format!("{}{}", origin, session.token.upload_path()),
            token: session.token.clone(),
            expires_at: session.expires_at,
        };

        self.store.insert(session).await;

        tracing::info!(
            token = %issued.token.log_prefix(),
            owner_user_id = %owner_user_id,
            expires_at = %issued.expires_at,
            "Upload token issued"
        );

        Ok(issued)
    }

    /// The hand-off page is served while the token is stored, expired or not.
    pub async fn ensure_renderable(&self, token: &UploadToken) -> Result<(), AppError> {
        if self.store.contains(token).await {
            tracing::debug!(token = %token.log_prefix(), "Hand-off page rendered");
            Ok(())
        } else {
            Err(invalid_token(token))
        }
    }

    /// Look the token up for a submit. Expired entries are dropped here.
    pub async fn begin_submit(&self, token: &UploadToken) -> Result<UploadSession, AppError> {
        match self.store.check_submit(token, self.clock.now()).await {
            SubmitCheck::Live(session) => Ok(session),
            SubmitCheck::Absent => {
                tracing::debug!(token = %token.log_prefix(), "Submit against absent token");
                Err(invalid_token(token))
            }
            SubmitCheck::Expired => {
                tracing::info!(token = %token.log_prefix(), "Expired upload token removed");
                Err(invalid_token(token))
            }
        }
    }

    /// Forward the file to the blob store, then consume the token.
    ///
    /// On a store failure the token is left untouched so the client can submit
    /// again before it expires.
    pub async fn complete_submit(
        &self,
        session: &UploadSession,
        file: IncomingFile,
    ) -> Result<UploadedImage, AppError> {
        let start = Instant::now();
        let size = file.data.len();

        let url = self
            .blob_store
            .store(
                session.owner_user_id,
                &file.filename,
                &file.content_type,
                file.data,
            )
            .await
            .map_err(|e| {
                tracing::warn!(
                    token = %session.token.log_prefix(),
                    owner_user_id = %session.owner_user_id,
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Blob store upload failed, token stays live"
                );
                storage_error_to_app(e)
            })?;

        match self.store.complete_upload(&session.token, url.clone()).await {
            Some(image) => {
                tracing::info!(
                    token = %session.token.log_prefix(),
                    owner_user_id = %session.owner_user_id,
                    image_id = %image.id,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload token consumed"
                );
                Ok(image)
            }
            None => {
                // Another submit consumed the token while this one was uploading.
                tracing::warn!(
                    token = %session.token.log_prefix(),
                    owner_user_id = %session.owner_user_id,
                    orphaned_url = %url,
                    "Upload token consumed concurrently, stored blob is orphaned"
                );
                Err(invalid_token(&session.token))
            }
        }
    }

    pub async fn list_images(&self, owner_user_id: Uuid) -> Vec<UploadedImage> {
        self.store.list_images(owner_user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use qrdrop_storage::{StorageError, StorageResult};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TestClock(Mutex<DateTime<Utc>>);

    impl TestClock {
        fn advance(&self, secs: i64) {
            let mut now = self.0.lock().unwrap();
            *now += Duration::seconds(secs);
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    #[derive(Default)]
    struct FlakyStore {
        fail: AtomicBool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BlobStore for FlakyStore {
        async fn store(
            &self,
            _owner_user_id: Uuid,
            filename: &str,
            _content_type: &str,
            _data: Bytes,
        ) -> StorageResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(StorageError::UpstreamStatus {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(format!("https://cdn.test/{}/{}", n, filename))
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    fn service() -> (HandoffService, Arc<TestClock>, Arc<FlakyStore>) {
        let clock = Arc::new(TestClock(Mutex::new(Utc::now())));
        let blob = Arc::new(FlakyStore::default());
        let service = HandoffService::new(
            HandoffStore::new(),
            blob.clone(),
            clock.clone(),
            Duration::seconds(300),
            UploadUrlBase::RequestHost {
                scheme: "https".to_string(),
            },
        );
        (service, clock, blob)
    }

    fn file() -> IncomingFile {
        IncomingFile {
            filename: "photo.png".to_string(),
            content_type: "image/png".to_string(),
            data: Bytes::from_static(b"png"),
        }
    }

    #[tokio::test]
    async fn test_issue_builds_url_from_host() {
        let (service, _, _) = service();
        let issued = service
            .issue(Uuid::new_v4(), Some("photos.example.com:8443"))
            .await
            .unwrap();
        assert_eq!(
            issued.upload_url,
            format!("https://photos.example.com:8443/upload/{}", issued.token)
        );
        assert!(service.store().contains(&issued.token).await);
    }

    #[tokio::test]
    async fn test_issue_rejects_missing_or_hostile_host() {
        let (service, _, _) = service();
        assert!(matches!(
            service.issue(Uuid::new_v4(), None).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service.issue(Uuid::new_v4(), Some("evil.com/phish?")).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_fixed_origin_ignores_host() {
        let base = UploadUrlBase::Fixed("https://drop.example/".to_string());
        assert_eq!(base.origin(None).unwrap(), "https://drop.example");
    }

    #[tokio::test]
    async fn test_absent_and_expired_tokens_are_rejected_alike() {
        let (service, clock, _) = service();
        let issued = service.issue(Uuid::new_v4(), Some("h")).await.unwrap();
        clock.advance(301);

        let expired = service.begin_submit(&issued.token).await.unwrap_err();
        let absent = service.begin_submit(&issued.token).await.unwrap_err();
        let never_issued = service
            .begin_submit(&UploadToken::from(issued.token.as_str().replace('-', "_")))
            .await
            .unwrap_err();

        // Same 8-character prefix, so the whole message must match.
        assert_eq!(expired.detailed_message(), absent.detailed_message());
        assert_eq!(expired.detailed_message(), never_issued.detailed_message());
        assert!(matches!(never_issued, AppError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_submit_after_expiry_is_rejected_and_removed() {
        let (service, clock, blob) = service();
        let issued = service.issue(Uuid::new_v4(), Some("h")).await.unwrap();

        clock.advance(301);
        let err = service.begin_submit(&issued.token).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken(_)));
        assert!(!service.store().contains(&issued.token).await);
        assert_eq!(blob.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_token_live_for_retry() {
        let (service, _, blob) = service();
        let owner = Uuid::new_v4();
        let issued = service.issue(owner, Some("h")).await.unwrap();

        blob.fail.store(true, Ordering::SeqCst);
        let session = service.begin_submit(&issued.token).await.unwrap();
        let err = service.complete_submit(&session, file()).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamStoreFailure(_)));
        assert!(service.store().contains(&issued.token).await);
        assert!(service.list_images(owner).await.is_empty());

        blob.fail.store(false, Ordering::SeqCst);
        let session = service.begin_submit(&issued.token).await.unwrap();
        let image = service.complete_submit(&session, file()).await.unwrap();
        assert_eq!(service.list_images(owner).await, vec![image]);
        assert!(!service.store().contains(&issued.token).await);
    }

    #[tokio::test]
    async fn test_late_finisher_loses_to_earlier_consumer() {
        let (service, _, _) = service();
        let owner = Uuid::new_v4();
        let issued = service.issue(owner, Some("h")).await.unwrap();

        let first = service.begin_submit(&issued.token).await.unwrap();
        let second = service.begin_submit(&issued.token).await.unwrap();

        service.complete_submit(&first, file()).await.unwrap();
        let err = service.complete_submit(&second, file()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken(_)));
        assert_eq!(service.list_images(owner).await.len(), 1);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename(Some("photo.png")), "photo.png");
        assert_eq!(sanitize_filename(Some("../../etc/passwd")), "passwd");
        assert_eq!(sanitize_filename(Some("C:\\Users\\me\\cat pic.jpg")), "cat_pic.jpg");
        assert_eq!(sanitize_filename(Some(".hidden")), "hidden");
        assert_eq!(sanitize_filename(Some("")), "upload");
        assert_eq!(sanitize_filename(Some("???")), "upload");
        assert_eq!(sanitize_filename(None), "upload");
        assert_eq!(sanitize_filename(Some(&"a".repeat(500))).len(), 128);
    }
}
