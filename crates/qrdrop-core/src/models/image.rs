use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::UPLOAD_SUCCESS_MESSAGE;

/// An image durably stored through a completed hand-off upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Durable location reported by the blob store
    pub url: String,
}

impl UploadedImage {
    pub fn new(user_id: Uuid, url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            url,
        }
    }
}

/// Body returned by a successful upload submit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub image_url: String,
}

impl From<&UploadedImage> for UploadResponse {
    fn from(image: &UploadedImage) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            image_url: image.url.clone(),
        }
    }
}
