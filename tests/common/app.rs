use std::sync::Arc;

use axum_test::TestServer;
use portfolio_api::build_router;
use portfolio_api::config::{CloudinaryConfig, Config};
use portfolio_api::mail::{InMemoryMailer, Mailer};
use portfolio_api::media::{InMemoryMediaStorage, MediaStorage};
use portfolio_api::state::AppState;

pub const NOTIFY_EMAIL: &str = "owner@example.com";

/// Test configuration
pub fn test_config() -> Config {
    Config {
        mongodb_url: "mongodb://localhost:27017".to_string(),
        mongodb_database: "portfolio_test".to_string(),
        jwt_secret: "test-jwt-secret-that-is-at-least-32-characters-long".to_string(),
        jwt_expires_in: time::Duration::days(7),
        // Cheapest Argon2 settings keep the suite fast
        password_hash_cost: 1,
        password_hash_memory_kib: 1024,
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origin: "*".to_string(),
        rate_limit_max: 100,
        rate_limit_window_secs: 900,
        max_upload_bytes: 1024 * 1024,
        cloudinary: CloudinaryConfig {
            cloud_name: "test".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        },
        email: None,
        contact_notify_email: Some(NOTIFY_EMAIL.to_string()),
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub media: Arc<InMemoryMediaStorage>,
    pub mailer: Arc<InMemoryMailer>,
}

impl TestApp {
    /// Create a new test application backed by in-memory stores
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let media = Arc::new(InMemoryMediaStorage::new());
        let mailer = Arc::new(InMemoryMailer::new());

        let media_storage: Arc<dyn MediaStorage> = media.clone();
        let outgoing: Arc<dyn Mailer> = mailer.clone();
        let state = AppState::in_memory(config, media_storage, Some(outgoing));

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            media,
            mailer,
        }
    }
}
