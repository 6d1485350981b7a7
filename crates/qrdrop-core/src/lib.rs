//! qrdrop Core Library
//!
//! This crate provides the domain models, error types, configuration and clock
//! abstraction shared by every qrdrop component.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{IssuedUpload, UploadResponse, UploadSession, UploadToken, UploadedImage};
pub use storage_types::StorageBackend;
