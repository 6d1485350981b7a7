use std::sync::Arc;

use axum::{extract::State, Json};
use qrdrop_core::UploadedImage;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// List images uploaded by the signed-in user, oldest first
#[utoipa::path(
    get,
    path = "/user/images",
    tag = "images",
    responses(
        (status = 200, description = "Images of the current user", body = Vec<UploadedImage>),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user_id, operation = "list_user_images"))]
pub async fn list_user_images(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<UploadedImage>>, HttpAppError> {
    let images = state.handoff.list_images(user_id).await;
    tracing::debug!(count = images.len(), "Listed user images");
    Ok(Json(images))
}
