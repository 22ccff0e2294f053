//! Constants shared by the server and the upload pipeline.

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Vendor folder every signed upload lands in. Part of the signed parameter set.
pub const UPLOAD_FOLDER: &str = "savanna/uploads";

/// Files smaller than this are uploaded as-is.
pub const COMPRESS_THRESHOLD_BYTES: u64 = 1024 * 1024;

/// Bounding box for re-encoded images.
pub const COMPRESS_MAX_WIDTH: u32 = 1920;
pub const COMPRESS_MAX_HEIGHT: u32 = 1080;

/// JPEG quality used when re-encoding (0.8 on a 0..1 scale).
pub const COMPRESS_JPEG_QUALITY: u8 = 80;

/// Per-file ceiling enforced before any network call.
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// Number of uploads in flight at once within a batch.
pub const BATCH_GROUP_SIZE: usize = 3;

/// Default vendor API host.
pub const DEFAULT_VENDOR_BASE_URL: &str = "https://api.cloudinary.com";
