use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    response::Html,
    Json,
};
use qrdrop_core::{UploadResponse, UploadToken};

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{handoff, page};
use crate::state::AppState;

/// Hand-off page
///
/// Serves the upload form for a token that is still stored. Expiry is checked
/// only when the form is submitted.
#[utoipa::path(
    get,
    path = "/upload/{token}",
    tag = "handoff",
    params(
        ("token" = String, Path, description = "Upload token from the QR code")
    ),
    responses(
        (status = 200, description = "Upload form", content_type = "text/html"),
        (status = 400, description = "Unknown or consumed token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, token), fields(operation = "upload_form"))]
pub async fn upload_form(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Html<String>, HttpAppError> {
    let token = UploadToken::from(token);
    state.handoff.ensure_renderable(&token).await?;
    Ok(Html(page::render_upload_form(&token)))
}

/// Submit an upload
///
/// Accepts a multipart body with a single `file` field, stores it and consumes
/// the token. If the blob store fails the token remains usable until it
/// expires.
#[utoipa::path(
    post,
    path = "/upload/{token}",
    tag = "handoff",
    params(
        ("token" = String, Path, description = "Upload token from the QR code")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Invalid or expired token, or malformed upload", body = ErrorResponse),
        (status = 500, description = "Blob store failure, token still usable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, token, multipart), fields(operation = "upload_submit"))]
pub async fn upload_submit(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let token = UploadToken::from(token);

    // Token first: a dead token is rejected without reading the body.
    let session = state.handoff.begin_submit(&token).await?;
    let file = handoff::read_upload(multipart?).await?;
    let image = state.handoff.complete_submit(&session, file).await?;

    Ok(Json(UploadResponse::from(&image)))
}
