//! Stores for data access
//!
//! `TokenStore` and `ImageRegistry` are plain maps without any locking of their own.
//! `HandoffStore` owns both behind one lock and is the only type handed to the
//! rest of the application.

pub mod handoff;
pub mod image_registry;
pub mod reaper;
pub mod token_store;

pub use handoff::{HandoffStore, StoreCounts, SubmitCheck};
pub use image_registry::ImageRegistry;
pub use reaper::spawn_session_reaper;
pub use token_store::TokenStore;
