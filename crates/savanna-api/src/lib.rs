//! Savanna API Library
//!
//! HTTP handlers, auth middleware and application setup for the content server.

mod api_doc;
mod handlers;
mod services;
mod telemetry;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use error::ErrorResponse;
pub use services::MediaHost;
