//! Test helpers: build AppState and router over the in-memory registry.
//!
//! Run from workspace root: `cargo test -p savanna-api`.

pub mod auth;

use std::sync::Arc;

use axum_test::TestServer;
use savanna_api::setup::routes;
use savanna_api::state::AppState;
use savanna_core::{Config, SignatureAlgorithm, VendorConfig};
use savanna_db::{seed_default_settings, MemoryRegistry, RegistryStore};

pub const TEST_ADMIN: &str = "admin";
pub const TEST_PASSWORD: &str = "correct horse battery staple";
pub const TEST_API_SECRET: &str = "test-api-secret-never-sent";

/// API path prefix for tests.
pub fn api_path(path: &str) -> String {
    format!("{}{}", savanna_core::constants::API_PREFIX, path)
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryRegistry>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_vendor(base_url: &str) -> VendorConfig {
    VendorConfig {
        cloud_name: "demo".to_string(),
        api_key: "123456".to_string(),
        api_secret: TEST_API_SECRET.to_string(),
        base_url: base_url.trim_end_matches('/').to_string(),
        algorithm: SignatureAlgorithm::Sha1,
    }
}

pub fn create_test_config(vendor: Option<VendorConfig>) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        database_url: "postgres://unused/savanna".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 1,
        jwt_secret: "test-jwt-secret-0123456789abcdef0123".to_string(),
        jwt_expiry_days: 30,
        admin_username: TEST_ADMIN.to_string(),
        admin_password_hash: bcrypt::hash(TEST_PASSWORD, 4).expect("hash test password"),
        vendor,
    }
}

/// App without media host credentials.
pub async fn setup_test_app() -> TestApp {
    build(None).await
}

/// App whose media host calls go to `vendor_base_url` (a mockito server).
pub async fn setup_test_app_with_vendor(vendor_base_url: &str) -> TestApp {
    build(Some(test_vendor(vendor_base_url))).await
}

async fn build(vendor: Option<VendorConfig>) -> TestApp {
    let config = create_test_config(vendor);
    let store = Arc::new(MemoryRegistry::new());
    seed_default_settings(store.as_ref())
        .await
        .expect("seed settings");

    let dyn_store: Arc<dyn RegistryStore> = store.clone();
    let state = Arc::new(AppState::new(config.clone(), dyn_store).expect("app state"));
    let app = routes::setup_routes(&config, state).expect("routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp { server, store }
}
