//! Savanna Core Library
//!
//! Domain models, error types, configuration and the upload signing primitive
//! shared by the API server, the admin client and the upload pipeline.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod signing;

// Re-export commonly used types
pub use config::{Config, VendorConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use signing::{api_sign_request, issue_signature, SignatureAlgorithm};
