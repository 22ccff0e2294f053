//! Admin authentication: HS256 tokens, the bearer middleware and the
//! failed-login limiter.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::JwtService;
pub use middleware::{auth_middleware, secure_compare, AuthFailureLimiter};
pub use models::{AdminClaims, AdminContext};
