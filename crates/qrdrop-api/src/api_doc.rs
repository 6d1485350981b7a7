//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use qrdrop_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "qrdrop API",
        version = "0.1.0",
        description = "Short-lived QR code upload hand-off. A signed-in user requests a QR code, a second device opens the encoded URL and uploads one file, and the stored image appears in the user's image list."
    ),
    paths(
        // Hand-off
        handlers::generate_qr::generate_qr,
        handlers::upload::upload_form,
        handlers::upload::upload_submit,
        // Images
        handlers::user_images::list_user_images,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::UploadedImage,
            models::UploadToken,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "handoff", description = "QR code issuance, hand-off page and upload submission"),
        (name = "images", description = "Images uploaded through completed hand-offs")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
