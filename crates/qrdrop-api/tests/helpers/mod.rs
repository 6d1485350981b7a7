//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p qrdrop-api --test handoff_test` or
//! `cargo test -p qrdrop-api`. The blob store and clock are in-process fakes, so
//! no network or Docker is needed.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use qrdrop_api::setup::{build_state, routes};
use qrdrop_api::state::AppState;
use qrdrop_core::{Clock, Config, StorageBackend};
use qrdrop_storage::BlobStore;
use std::sync::Arc;
use uuid::Uuid;

use storage::{ManualClock, MockBlobStore};

/// Public origin embedded in hand-off URLs during tests.
pub const TEST_PUBLIC_BASE_URL: &str = "http://qrdrop.test";

/// Upload size limit used by the test router.
pub const TEST_MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub blob_store: Arc<MockBlobStore>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Cookie header value for a signed-in user.
    pub fn session_cookie(&self, user_id: Uuid) -> String {
        auth::session_cookie(user_id)
    }
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.0.base.environment = "test".to_string();
    config.0.base.session_secret = auth::TEST_SESSION_SECRET.to_string();
    config.0.base.cors_origins = vec!["http://localhost:3000".to_string()];
    config.0.public_base_url = Some(TEST_PUBLIC_BASE_URL.to_string());
    config.0.max_upload_size_bytes = TEST_MAX_UPLOAD_BYTES;
    config.0.session_reap_interval_secs = 0;
    config.0.storage_backend = StorageBackend::Uploadcare;
    config
}

/// Setup test app with a mock blob store and a manual clock.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with_store(MockBlobStore::new())
}

pub fn setup_test_app_with_store(blob_store: MockBlobStore) -> TestApp {
    let config = create_test_config();
    let blob_store = Arc::new(blob_store);
    let clock = Arc::new(ManualClock::default());

    let state = build_state(
        config.clone(),
        blob_store.clone() as Arc<dyn BlobStore>,
        clock.clone() as Arc<dyn Clock>,
    );
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        blob_store,
        clock,
    }
}
