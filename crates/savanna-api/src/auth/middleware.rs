use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use savanna_core::AppError;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

use crate::auth::models::AdminContext;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Upper bound on identifiers tracked at once.
const MAX_TRACKED_KEYS: usize = 1024;

/// Counts failed logins per identifier within a fixed window.
#[derive(Clone)]
pub struct AuthFailureLimiter {
    inner: Arc<Mutex<HashMap<String, (u32, Instant)>>>,
    max_failures: u32,
    window: Duration,
}

impl AuthFailureLimiter {
    pub fn new(max_failures: u32, window_seconds: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_failures,
            window: Duration::from_secs(window_seconds),
        }
    }

    /// Records a failure. Returns true once the identifier is blocked.
    ///
    /// Expired windows are dropped on every call. When the table is full a new
    /// identifier is not tracked.
    pub async fn record_failure(&self, key: &str) -> bool {
        let mut guard = self.inner.lock().await;
        let now = Instant::now();
        guard.retain(|_, (_, reset_at)| now < *reset_at);
        if !guard.contains_key(key) && guard.len() >= MAX_TRACKED_KEYS {
            tracing::warn!(tracked = guard.len(), "Login failure table full");
            return false;
        }
        let (count, reset_at) = guard
            .entry(key.to_string())
            .or_insert((0, now + self.window));
        if now >= *reset_at {
            *count = 0;
            *reset_at = now + self.window;
        }
        *count += 1;
        *count >= self.max_failures
    }

    pub async fn is_blocked(&self, key: &str) -> bool {
        let mut guard = self.inner.lock().await;
        if let Some((count, reset_at)) = guard.get(key) {
            if Instant::now() >= *reset_at {
                guard.remove(key);
                return false;
            }
            return *count >= self.max_failures;
        }
        false
    }

    pub async fn reset(&self, key: &str) {
        self.inner.lock().await.remove(key);
    }
}

pub fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Requires `Authorization: Bearer <jwt>` and inserts [`AdminContext`].
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!("Missing authorization header");
            return HttpAppError(AppError::Unauthorized(
                "Not authorized, no token".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    match state.jwt.verify(token.trim()) {
        Ok(claims) => {
            if !secure_compare(&claims.sub, &state.config.admin_username) {
                return HttpAppError(AppError::Unauthorized("Not authorized".to_string()))
                    .into_response();
            }
            request.extensions_mut().insert(AdminContext {
                username: claims.sub,
            });
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            HttpAppError(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_compare() {
        assert!(secure_compare("admin", "admin"));
        assert!(!secure_compare("admin", "admin2"));
        assert!(!secure_compare("admin", "Admin"));
    }

    #[tokio::test]
    async fn test_limiter_blocks_after_max_failures() {
        let limiter = AuthFailureLimiter::new(3, 900);
        assert!(!limiter.record_failure("admin").await);
        assert!(!limiter.record_failure("admin").await);
        assert!(!limiter.is_blocked("admin").await);
        assert!(limiter.record_failure("admin").await);
        assert!(limiter.is_blocked("admin").await);
        assert!(!limiter.is_blocked("someone-else").await);

        limiter.reset("admin").await;
        assert!(!limiter.is_blocked("admin").await);
    }

    #[tokio::test]
    async fn test_limiter_table_is_bounded() {
        let limiter = AuthFailureLimiter::new(5, 900);
        let padding = "x".repeat(1024);
        for i in 0..10_000 {
            limiter.record_failure(&format!("{}{}", padding, i)).await;
        }
        assert!(limiter.inner.lock().await.len() <= MAX_TRACKED_KEYS);

        // Keys already tracked keep counting when the table is full.
        let tracked = format!("{}0", padding);
        for _ in 0..4 {
            limiter.record_failure(&tracked).await;
        }
        assert!(limiter.is_blocked(&tracked).await);
    }

    #[tokio::test]
    async fn test_limiter_sweeps_expired_entries() {
        let limiter = AuthFailureLimiter::new(5, 0);
        for i in 0..100 {
            limiter.record_failure(&format!("id-{}", i)).await;
        }
        assert!(limiter.inner.lock().await.len() <= 1);
    }

    #[tokio::test]
    async fn test_limiter_window_expires() {
        let limiter = AuthFailureLimiter::new(1, 0);
        assert!(limiter.record_failure("admin").await);
        assert!(!limiter.is_blocked("admin").await);
    }
}
