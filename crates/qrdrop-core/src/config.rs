//! Configuration module
//!
//! Server, session, hand-off and blob store settings, read from the environment
//! once at start-up.

use std::env;

use crate::constants::{
    MAX_UPLOAD_SIZE_BYTES, MIN_QR_SIZE_PX, QR_SIZE_PX, UPLOAD_TOKEN_TTL_SECS,
};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const SESSION_REAP_INTERVAL_SECS: u64 = 60;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const UPLOADCARE_TIMEOUT_SECS: u64 = 30;
const MIN_SESSION_SECRET_LEN: usize = 32;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_UPLOADCARE_UPLOAD_URL: &str = "https://upload.uploadcare.com/base/";
const DEFAULT_UPLOADCARE_CDN_URL: &str = "https://ucarecdn.com";

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
    pub session_secret: String,
    pub session_cookie_name: String,
}

/// Upload hand-off and blob store settings
#[derive(Clone, Debug)]
pub struct HandoffConfig {
    pub base: BaseConfig,
    // Upload URL construction
    pub public_scheme: String,
    pub public_base_url: Option<String>,
    // Token lifecycle
    pub upload_token_ttl_secs: i64,
    pub session_reap_interval_secs: u64,
    pub max_upload_size_bytes: usize,
    pub qr_size_px: u32,
    // Blob store
    pub storage_backend: StorageBackend,
    pub uploadcare_public_key: Option<String>,
    pub uploadcare_upload_url: String,
    pub uploadcare_cdn_url: String,
    pub uploadcare_timeout_secs: u64,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec![DEFAULT_CORS_ORIGINS.to_string()],
            environment: "development".to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            session_secret: String::new(),
            session_cookie_name: crate::constants::DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            public_scheme: "https".to_string(),
            public_base_url: None,
            upload_token_ttl_secs: UPLOAD_TOKEN_TTL_SECS,
            session_reap_interval_secs: SESSION_REAP_INTERVAL_SECS,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_BYTES,
            qr_size_px: QR_SIZE_PX,
            storage_backend: StorageBackend::Uploadcare,
            uploadcare_public_key: None,
            uploadcare_upload_url: DEFAULT_UPLOADCARE_UPLOAD_URL.to_string(),
            uploadcare_cdn_url: DEFAULT_UPLOADCARE_CDN_URL.to_string(),
            uploadcare_timeout_secs: UPLOADCARE_TIMEOUT_SECS,
            local_storage_path: None,
            local_storage_base_url: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<HandoffConfig>);

impl Config {
    fn inner(&self) -> &HandoffConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = HandoffConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn session_secret(&self) -> &str {
        &self.inner().base.session_secret
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.inner().base.session_cookie_name
    }

    pub fn public_scheme(&self) -> &str {
        &self.inner().public_scheme
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.inner().public_base_url.as_deref()
    }

    pub fn upload_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.inner().upload_token_ttl_secs)
    }

    pub fn session_reap_interval_secs(&self) -> u64 {
        self.inner().session_reap_interval_secs
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn qr_size_px(&self) -> u32 {
        self.inner().qr_size_px
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn uploadcare_public_key(&self) -> Option<&str> {
        self.inner().uploadcare_public_key.as_deref()
    }

    pub fn uploadcare_upload_url(&self) -> &str {
        &self.inner().uploadcare_upload_url
    }

    pub fn uploadcare_cdn_url(&self) -> &str {
        &self.inner().uploadcare_cdn_url
    }

    pub fn uploadcare_timeout_secs(&self) -> u64 {
        self.inner().uploadcare_timeout_secs
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }
}

impl HandoffConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            session_secret: env::var("SESSION_SECRET")
                .map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set to verify session cookies"))?,
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| crate::constants::DEFAULT_SESSION_COOKIE.to_string()),
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Uploadcare,
        };

        let config = HandoffConfig {
            base,
            public_scheme: env::var("PUBLIC_SCHEME").unwrap_or_else(|_| "https".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL").ok().filter(|s| !s.trim().is_empty()),
            upload_token_ttl_secs: env::var("UPLOAD_TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(UPLOAD_TOKEN_TTL_SECS),
            session_reap_interval_secs: env::var("SESSION_REAP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SESSION_REAP_INTERVAL_SECS),
            max_upload_size_bytes: env::var("MAX_UPLOAD_SIZE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_UPLOAD_SIZE_BYTES),
            qr_size_px: env::var("QR_SIZE_PX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(QR_SIZE_PX),
            storage_backend,
            uploadcare_public_key: env::var("UPLOADCARE_PUBLIC_KEY").ok(),
            uploadcare_upload_url: env::var("UPLOADCARE_UPLOAD_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOADCARE_UPLOAD_URL.to_string()),
            uploadcare_cdn_url: env::var("UPLOADCARE_CDN_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOADCARE_CDN_URL.to_string()),
            uploadcare_timeout_secs: env::var("UPLOADCARE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(UPLOADCARE_TIMEOUT_SECS),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "SESSION_SECRET must be at least {} characters long",
                MIN_SESSION_SECRET_LEN
            ));
        }

        let env = self.base.environment.to_lowercase();
        if (env == "production" || env == "prod") && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.upload_token_ttl_secs <= 0 {
            return Err(anyhow::anyhow!("UPLOAD_TOKEN_TTL_SECS must be positive"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_BYTES must be positive"));
        }

        if self.qr_size_px < MIN_QR_SIZE_PX {
            return Err(anyhow::anyhow!(
                "QR_SIZE_PX must be at least {}",
                MIN_QR_SIZE_PX
            ));
        }

        if !matches!(self.public_scheme.as_str(), "http" | "https") {
            return Err(anyhow::anyhow!("PUBLIC_SCHEME must be 'http' or 'https'"));
        }

        match self.storage_backend {
            StorageBackend::Uploadcare => {
                if self.uploadcare_public_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "UPLOADCARE_PUBLIC_KEY must be set when STORAGE_BACKEND=uploadcare"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when STORAGE_BACKEND=s3"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3"
                    ));
                }
            }
        }

        tracing::debug!(
            storage_backend = %self.storage_backend,
            upload_token_ttl_secs = self.upload_token_ttl_secs,
            "Configuration validated"
        );

        Ok(())
    }
}
