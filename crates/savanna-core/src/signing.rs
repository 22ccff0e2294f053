//! Request signing for direct-to-vendor uploads.
//!
//! The vendor authorizes an upload when `signature` equals
//! `hex(hash(sorted "k=v" pairs joined by '&' + api_secret))`. The secret never
//! leaves the server; clients only receive the signature, the timestamp and the
//! public identifiers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::config::VendorConfig;
use crate::error::AppError;
use crate::models::UploadSignature;

/// Parameters the vendor never includes in the signed string.
const UNSIGNED_PARAMS: &[&str] = &["file", "cloud_name", "resource_type", "api_key"];

/// Hash used for request signatures. The vendor defaults to SHA-1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(format!("unknown signature algorithm '{}'", other)),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => f.write_str("sha1"),
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}

/// Builds the string that gets hashed: parameters sorted by key, empty values and
/// unsigned parameters dropped.
pub fn string_to_sign(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(k, v)| !v.is_empty() && !UNSIGNED_PARAMS.contains(&k.as_str()))
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signs a parameter set with the vendor secret.
pub fn api_sign_request(
    params: &BTreeMap<String, String>,
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> Result<String, AppError> {
    if api_secret.is_empty() {
        return Err(AppError::Signing("API secret is empty".to_string()));
    }
    if let Some(key) = params
        .keys()
        .find(|k| k.is_empty() || k.contains(|c: char| c == '&' || c == '='))
    {
        return Err(AppError::Signing(format!(
            "parameter name '{}' cannot be signed",
            key
        )));
    }

    let payload = string_to_sign(params);
    if payload.is_empty() {
        return Err(AppError::Signing("nothing to sign".to_string()));
    }

    let digest = match algorithm {
        SignatureAlgorithm::Sha1 => {
            let mut hasher = Sha1::new();
            hasher.update(payload.as_bytes());
            hasher.update(api_secret.as_bytes());
            hex::encode(hasher.finalize())
        }
        SignatureAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(payload.as_bytes());
            hasher.update(api_secret.as_bytes());
            hex::encode(hasher.finalize())
        }
    };

    Ok(digest)
}

/// Issues an upload authorization for `folder` at `timestamp` (Unix seconds).
///
/// The signed set is exactly `{timestamp, folder}`; the client must send the same
/// two values on the upload call.
pub fn issue_signature(
    vendor: Option<&VendorConfig>,
    folder: &str,
    timestamp: i64,
) -> Result<UploadSignature, AppError> {
    let vendor = vendor.ok_or_else(|| {
        AppError::Configuration(
            "CLOUDINARY_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set"
                .to_string(),
        )
    })?;

    let params = BTreeMap::from([
        ("timestamp".to_string(), timestamp.to_string()),
        ("folder".to_string(), folder.to_string()),
    ]);
    let signature = api_sign_request(&params, &vendor.api_secret, vendor.algorithm)?;

    Ok(UploadSignature {
        signature,
        timestamp,
        cloud_name: vendor.cloud_name.clone(),
        api_key: vendor.api_key.clone(),
        folder: folder.to_string(),
    })
}

/// Signs a destroy call for an existing asset.
pub fn destroy_params(
    vendor: &VendorConfig,
    public_id: &str,
    timestamp: i64,
) -> Result<BTreeMap<String, String>, AppError> {
    let mut params = BTreeMap::from([
        ("public_id".to_string(), public_id.to_string()),
        ("timestamp".to_string(), timestamp.to_string()),
    ]);
    let signature = api_sign_request(&params, &vendor.api_secret, vendor.algorithm)?;
    params.insert("signature".to_string(), signature);
    params.insert("api_key".to_string(), vendor.api_key.clone());
    Ok(params)
}
