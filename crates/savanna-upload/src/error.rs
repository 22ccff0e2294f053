use savanna_core::AppError;

/// Why one file of a batch did not end up in the registry.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("File is empty")]
    Empty,

    #[error("Could not start upload: {0}")]
    Signature(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Media host rejected upload ({status}): {message}")]
    Vendor { status: u16, message: String },

    #[error("Unexpected media host response: {0}")]
    InvalidResponse(String),

    /// The asset exists on the vendor but no photo references it.
    #[error("Uploaded to {url} but saving the photo failed: {message}")]
    Registry { url: String, message: String },

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Rejected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::TooLarge { .. } | UploadError::Empty)
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge { .. } | UploadError::Empty => {
                AppError::Validation(err.to_string())
            }
            UploadError::Signature(msg) => AppError::Signing(msg),
            UploadError::Transport(_)
            | UploadError::Vendor { .. }
            | UploadError::InvalidResponse(_) => AppError::Upload(err.to_string()),
            UploadError::Registry { .. } => AppError::Registry(err.to_string()),
            UploadError::Io(e) => AppError::from(e),
        }
    }
}
