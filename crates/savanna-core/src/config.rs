//! Configuration module
//!
//! Server configuration is read from the environment (with `.env` support).
//! Vendor credentials are optional at startup: without them the server still
//! serves the registry, but the signature endpoint fails with
//! [`AppError::Configuration`](crate::AppError::Configuration).

use std::env;

use crate::constants::DEFAULT_VENDOR_BASE_URL;
use crate::signing::SignatureAlgorithm;

const SERVER_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_DAYS: i64 = 30;
const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Credentials and endpoint of the external media host.
#[derive(Clone, Debug)]
pub struct VendorConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub algorithm: SignatureAlgorithm,
}

impl VendorConfig {
    /// Reads the vendor variables. Returns `None` unless name, key and secret are all set.
    pub fn from_env() -> Option<Self> {
        let cloud_name = non_empty_var("CLOUDINARY_NAME")?;
        let api_key = non_empty_var("CLOUDINARY_API_KEY")?;
        let api_secret = non_empty_var("CLOUDINARY_API_SECRET")?;

        Some(Self {
            cloud_name,
            api_key,
            api_secret,
            base_url: env::var("CLOUDINARY_UPLOAD_BASE")
                .unwrap_or_else(|_| DEFAULT_VENDOR_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            algorithm: env::var("CLOUDINARY_SIGNATURE_ALGORITHM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        })
    }

    /// `{base}/v1_1/{cloud}/image/{action}`
    pub fn image_endpoint(&self, action: &str) -> String {
        format!("{}/v1_1/{}/image/{}", self.base_url, self.cloud_name, action)
    }
}

/// Application configuration for the API server.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub vendor: Option<VendorConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DATABASE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_days: env::var("JWT_EXPIRY_DAYS")
                .unwrap_or_else(|_| JWT_EXPIRY_DAYS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_DAYS),
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").map_err(|_| {
                anyhow::anyhow!("ADMIN_PASSWORD_HASH must be set (see `savanna hash-password`)")
            })?,
            vendor: VendorConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if !self.admin_password_hash.starts_with("$2") {
            return Err(anyhow::anyhow!(
                "ADMIN_PASSWORD_HASH must be a bcrypt hash"
            ));
        }

        if self.jwt_expiry_days <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRY_DAYS must be positive"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn vendor_configured(&self) -> bool {
        self.vendor.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
