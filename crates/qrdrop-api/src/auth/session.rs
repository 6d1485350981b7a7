//! Signed session cookie.
//!
//! Cookie value = base64url(user_id (16 bytes) || HMAC-SHA256(secret, user_id)).

use axum::http::{header::COOKIE, HeaderMap};
use base64::Engine;
use hmac::{Hmac, Mac};
use qrdrop_core::AppError;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

const USER_ID_LEN: usize = 16;
const MAC_LEN: usize = 32; // SHA256
const COOKIE_VALUE_LEN: usize = USER_ID_LEN + MAC_LEN;

/// Resolves the current user id from request headers.
pub trait SessionResolver: Send + Sync {
    /// Returns `AppError::Unauthorized` when there is no valid session.
    fn resolve(&self, headers: &HeaderMap) -> Result<Uuid, AppError>;
}

/// HMAC-signed cookie shared with the authentication service.
#[derive(Clone)]
pub struct SignedCookieSession {
    secret: Vec<u8>,
    cookie_name: String,
}

impl SignedCookieSession {
    pub fn new(secret: impl Into<Vec<u8>>, cookie_name: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: cookie_name.into(),
        }
    }

    fn sign(&self, user_id: &Uuid) -> Result<[u8; MAC_LEN], AppError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(format!("Invalid session secret: {}", e)))?;
        mac.update(user_id.as_bytes());
        let mut tag = [0u8; MAC_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        Ok(tag)
    }

    /// Build the cookie value for `user_id`.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let tag = self.sign(&user_id)?;
        let mut value = [0u8; COOKIE_VALUE_LEN];
        value[..USER_ID_LEN].copy_from_slice(user_id.as_bytes());
        value[USER_ID_LEN..].copy_from_slice(&tag);
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(value))
    }

    /// Verify a cookie value and return the user id it was issued for.
    pub fn verify(&self, value: &str) -> Result<Uuid, AppError> {
        let invalid = || AppError::Unauthorized("Invalid session".to_string());

        let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|_| invalid())?;
        if decoded.len() != COOKIE_VALUE_LEN {
            return Err(invalid());
        }

        let (id_bytes, tag) = decoded.split_at(USER_ID_LEN);
        let user_id = Uuid::from_slice(id_bytes).map_err(|_| invalid())?;
        let expected = self.sign(&user_id)?;
        if !bool::from(expected.as_slice().ct_eq(tag)) {
            return Err(invalid());
        }

        Ok(user_id)
    }
}

/// Find a cookie by name across every `Cookie` header.
fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

impl SessionResolver for SignedCookieSession {
    fn resolve(&self, headers: &HeaderMap) -> Result<Uuid, AppError> {
        let value = find_cookie(headers, &self.cookie_name)
            .ok_or_else(|| AppError::Unauthorized("Missing session cookie".to_string()))?;
        self.verify(value)
    }
}
