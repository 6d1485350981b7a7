//! Shared key generation for storage backends.
//!
//! Key format: `uploads/{owner_user_id}/{object_id}-{filename}`.

use uuid::Uuid;

/// Generate a storage key for an upload owned by `owner_user_id`.
///
/// A fresh object id prefixes the filename so two uploads with the same name
/// never collide.
pub fn generate_storage_key(owner_user_id: Uuid, filename: &str) -> String {
    format!("uploads/{}/{}-{}", owner_user_id, Uuid::new_v4(), filename)
}
