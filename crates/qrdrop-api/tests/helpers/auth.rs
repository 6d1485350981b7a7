use qrdrop_api::auth::SignedCookieSession;
use qrdrop_core::constants::DEFAULT_SESSION_COOKIE;
use uuid::Uuid;

/// Test session secret (must match create_test_config).
pub const TEST_SESSION_SECRET: &str = "test-session-secret-at-least-32-characters-long";

/// `Cookie` header value carrying a valid session for `user_id`.
pub fn session_cookie(user_id: Uuid) -> String {
    let session = SignedCookieSession::new(TEST_SESSION_SECRET, DEFAULT_SESSION_COOKIE);
    let value = session
        .issue(user_id)
        .expect("Failed to sign session cookie");
    format!("{}={}", DEFAULT_SESSION_COOKIE, value)
}

/// Cookie signed with a different secret.
pub fn forged_session_cookie(user_id: Uuid) -> String {
    let session = SignedCookieSession::new(
        "some-other-secret-that-is-also-32-characters",
        DEFAULT_SESSION_COOKIE,
    );
    let value = session
        .issue(user_id)
        .expect("Failed to sign session cookie");
    format!("{}={}", DEFAULT_SESSION_COOKIE, value)
}
