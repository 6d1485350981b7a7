use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE, HOST},
        HeaderMap, HeaderName, HeaderValue, Uri,
    },
    response::{IntoResponse, Response},
};
use qrdrop_core::AppError;

use crate::auth::CurrentUser;
use crate::constants::{HEADER_UPLOAD_EXPIRES_AT, HEADER_UPLOAD_TOKEN, HEADER_UPLOAD_URL};
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::qr;
use crate::state::AppState;

fn header_value(value: &str) -> Result<HeaderValue, HttpAppError> {
    HeaderValue::from_str(value).map_err(|e| {
        HttpAppError::from(AppError::Internal(format!("Invalid header value: {}", e)))
    })
}

/// Host the request was addressed to. HTTP/2 clients send `:authority` instead
/// of a `Host` header, which surfaces as the URI authority.
fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
}

/// Issue an upload token for the signed-in user
///
/// Returns a PNG QR code encoding the hand-off URL. The raw token, URL and
/// expiry are repeated in `X-Upload-*` response headers.
#[utoipa::path(
    get,
    path = "/generate-qr",
    tag = "handoff",
    responses(
        (status = 200, description = "QR code encoding the hand-off URL", content_type = "image/png"),
        (status = 400, description = "Missing or invalid Host header", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "QR rendering failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, uri), fields(user_id = %user_id, operation = "generate_qr"))]
pub async fn generate_qr(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let issued = state
        .handoff
        .issue(user_id, request_host(&headers, &uri))
        .await?;

    let png = qr::render_png(&issued.upload_url, state.config.qr_size_px())?;

    let response_headers = [
        (CONTENT_TYPE, HeaderValue::from_static("image/png")),
        (CACHE_CONTROL, HeaderValue::from_static("no-store")),
        (
            HeaderName::from_static(HEADER_UPLOAD_TOKEN),
            header_value(issued.token.as_str())?,
        ),
        (
            HeaderName::from_static(HEADER_UPLOAD_URL),
            header_value(&issued.upload_url)?,
        ),
        (
            HeaderName::from_static(HEADER_UPLOAD_EXPIRES_AT),
            header_value(&issued.expires_at.to_rfc3339())?,
        ),
    ];
    Ok((response_headers, png).into_response())
}
