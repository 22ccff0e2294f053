use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use savanna_core::AppError;
use serde::{Deserialize, Serialize};

use crate::error::HttpAppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String, // admin username
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated admin, inserted into request extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub username: String,
}

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminContext>()
            .cloned()
            .ok_or_else(|| HttpAppError(AppError::Unauthorized("Not authorized".to_string())))
    }
}
