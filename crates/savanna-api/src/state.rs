//! Application state shared by every handler.

use std::sync::Arc;

use savanna_core::Config;
use savanna_db::RegistryStore;

use crate::auth::{AuthFailureLimiter, JwtService};
use crate::services::MediaHost;

/// Failed logins allowed per identifier before the limiter answers 429.
pub const LOGIN_MAX_FAILURES: u32 = 5;
/// Window for counting failed logins (15 minutes).
pub const LOGIN_WINDOW_SECONDS: u64 = 15 * 60;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RegistryStore>,
    pub config: Config,
    pub jwt: JwtService,
    pub login_limiter: Arc<AuthFailureLimiter>,
    pub media_host: MediaHost,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RegistryStore>) -> anyhow::Result<Self> {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiry_days);
        let media_host = MediaHost::new(config.vendor.clone())?;

        Ok(Self {
            store,
            jwt,
            login_limiter: Arc::new(AuthFailureLimiter::new(
                LOGIN_MAX_FAILURES,
                LOGIN_WINDOW_SECONDS,
            )),
            media_host,
            config,
        })
    }
}
