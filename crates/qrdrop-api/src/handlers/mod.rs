//! HTTP handlers

pub mod generate_qr;
pub mod upload;
pub mod user_images;
