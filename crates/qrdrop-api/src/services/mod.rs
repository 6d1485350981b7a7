//! Business logic behind the handlers.

pub mod handoff;
pub mod page;
pub mod qr;

pub use handoff::{HandoffService, IncomingFile, UploadUrlBase};
