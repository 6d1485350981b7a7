//! Test fixtures: image bytes and upload forms.

use axum_test::multipart::{MultipartForm, Part};

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// Upload form with the PNG in the `file` field.
pub fn png_upload_form() -> MultipartForm {
    file_form("file", "photo.png", create_minimal_png())
}

/// Upload form with arbitrary bytes under `field`.
pub fn file_form(field: &str, file_name: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type("image/png");
    MultipartForm::new().add_part(field.to_string(), part)
}

/// Form with only a text field and no file.
pub fn form_without_file() -> MultipartForm {
    MultipartForm::new().add_text("caption", "no file attached")
}
