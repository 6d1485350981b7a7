//! Fixed protocol values for the upload hand-off.

/// Lifetime of an upload token, measured from issuance.
pub const UPLOAD_TOKEN_TTL_SECS: i64 = 5 * 60;

/// Maximum accepted multipart body for a hand-off upload (10 MiB).
pub const MAX_UPLOAD_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Edge length of the rendered QR bitmap.
pub const QR_SIZE_PX: u32 = 256;

/// Smallest QR bitmap that still gives an upload URL code at least two pixels
/// per module, quiet zone included.
pub const MIN_QR_SIZE_PX: u32 = 128;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Cookie holding the signed session issued by the authentication service.
pub const DEFAULT_SESSION_COOKIE: &str = "session";

/// Path template of the hand-off page and upload target. `{token}` is replaced.
pub const UPLOAD_PATH_TEMPLATE: &str = "/upload/{token}";

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";
