//! QR code rendering.

use image::imageops::{resize, FilterType};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use qrdrop_core::AppError;
use std::io::Cursor;

/// Render `data` as a square PNG of exactly `size_px` pixels per side.
///
/// Medium error correction, with the standard quiet zone.
pub fn render_png(data: &str, size_px: u32) -> Result<Vec<u8>, AppError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| AppError::Internal(format!("Failed to encode QR code: {}", e)))?;

    let rendered = code
        .render::<Luma<u8>>()
        .min_dimensions(size_px, size_px)
        .build();

    // Module scaling is integral, so the rendered edge can overshoot.
    let bitmap = if rendered.width() == size_px && rendered.height() == size_px {
        rendered
    } else {
        resize(&rendered, size_px, size_px, FilterType::Nearest)
    };

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(bitmap)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to encode QR PNG: {}", e)))?;

    Ok(png)
}
