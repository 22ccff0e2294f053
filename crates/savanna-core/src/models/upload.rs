use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Time-boxed authorization for one direct upload. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadSignature {
    pub signature: String,
    /// Unix seconds the signature was issued for
    pub timestamp: i64,
    pub cloud_name: String,
    pub api_key: String,
    /// Destination folder that was signed. Must be sent unchanged.
    pub folder: String,
}

/// Fields of the vendor's upload response the pipeline relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAsset {
    pub secure_url: String,
    pub public_id: String,
}

impl VendorAsset {
    /// Derives the public id from a delivery URL such as
    /// `https://res.cloudinary.com/demo/image/upload/v1570979139/savanna/slides/sample.jpg`
    /// (yields `savanna/slides/sample`). Returns `None` for URLs that are not
    /// vendor delivery URLs.
    pub fn public_id_from_url(url: &str) -> Option<String> {
        let (_, path) = url.split_once("/upload/")?;
        let path = path
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or(path);
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if segments.first().is_some_and(|s| is_version_segment(s)) {
            segments.remove(0);
        }

        let last = segments.pop()?;
        let stem = match last.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => stem,
            _ => last,
        };
        segments.push(stem);
        Some(segments.join("/"))
    }
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
