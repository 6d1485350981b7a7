//! qrdrop Storage Library
//!
//! The blob store collaborator: a [`BlobStore`] persists the bytes of a completed
//! hand-off upload and answers with a durable, fetchable URL.
//!
//! # Backends
//!
//! - **Uploadcare** (default): proxies the file to the Uploadcare upload API and
//!   returns the CDN URL of the stored file.
//! - **Local**: writes below a directory served elsewhere under a base URL.
//! - **S3**: puts the object into a bucket through `object_store`.
//!
//! Filesystem and S3 keys share the layout `uploads/{owner_user_id}/{image_id}-{filename}`,
//! generated in the `keys` module.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
#[cfg(feature = "storage-uploadcare")]
pub mod uploadcare;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use qrdrop_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{BlobStore, StorageError, StorageResult};
#[cfg(feature = "storage-uploadcare")]
pub use uploadcare::UploadcareStorage;
