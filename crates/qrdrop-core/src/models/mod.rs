//! Data models for the upload hand-off
//!
//! `upload_session` covers issued tokens, `image` the records produced by a
//! completed upload.

mod image;
mod upload_session;

pub use image::*;
pub use upload_session::*;
