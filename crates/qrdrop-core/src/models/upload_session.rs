use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::UPLOAD_PATH_TEMPLATE;

/// Opaque upload token.
///
/// Generated from a random v4 UUID (122 random bits), so values are never reused
/// and never sequential. Any string is accepted when parsing a URL path segment;
/// unknown values simply never match an issued session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UploadToken(String);

impl UploadToken {
    pub fn generate() -> Self {
        UploadToken(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First characters of the token, safe to put in logs.
    pub fn log_prefix(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    /// Path of the hand-off page and upload target for this token.
    pub fn upload_path(&self) -> String {
        UPLOAD_PATH_TEMPLATE.replace("{token}", &self.0)
    }
}

impl Display for UploadToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for UploadToken {
    fn from(value: String) -> Self {
        UploadToken(value)
    }
}

impl From<&str> for UploadToken {
    fn from(value: &str) -> Self {
        UploadToken(value.to_string())
    }
}

/// One issued, not-yet-consumed upload opportunity.
///
/// Never mutated after issuance; consumption removes it from the token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub token: UploadToken,
    pub owner_user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl UploadSession {
    pub fn new(owner_user_id: Uuid, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token: UploadToken::generate(),
            owner_user_id,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// A session is expired from `expires_at` onwards (inclusive).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Raw fields of a freshly issued upload token.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedUpload {
    pub token: UploadToken,
    pub upload_url: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_tokens_are_unique() {
        let tokens: HashSet<UploadToken> = (0..10_000).map(|_| UploadToken::generate()).collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn test_generated_token_is_random_uuid() {
        let token = UploadToken::generate();
        let parsed = Uuid::parse_str(token.as_str()).expect("token should be a uuid");
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let issued_at = Utc::now();
        let session = UploadSession::new(Uuid::new_v4(), issued_at, Duration::seconds(300));
        assert_eq!(session.expires_at, issued_at + Duration::seconds(300));
        assert!(!session.is_expired_at(issued_at + Duration::seconds(299)));
        assert!(session.is_expired_at(issued_at + Duration::seconds(300)));
        assert!(session.is_expired_at(issued_at + Duration::seconds(301)));
    }

    #[test]
    fn test_upload_path_embeds_token() {
        let token = UploadToken::from("abc-123");
        assert_eq!(token.upload_path(), "/upload/abc-123");
        assert_eq!(token.log_prefix(), "abc-123");
        assert_eq!(UploadToken::from("0123456789").log_prefix(), "01234567");
    }
}
