//! qrdrop API Library
//!
//! HTTP surface of the upload hand-off: QR issuance, the hand-off page, the
//! upload endpoint and the per-user image list, plus application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
