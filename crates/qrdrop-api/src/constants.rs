//! HTTP-level constants
//!
//! Header names are lowercase so they can be used with `HeaderName::from_static`.

/// Response header carrying the raw upload token on `GET /generate-qr`.
pub const HEADER_UPLOAD_TOKEN: &str = "x-upload-token";

/// Response header carrying the absolute hand-off URL encoded in the QR code.
pub const HEADER_UPLOAD_URL: &str = "x-upload-url";

/// Response header carrying the token expiry as RFC 3339.
pub const HEADER_UPLOAD_EXPIRES_AT: &str = "x-upload-expires-at";

pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";

pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
