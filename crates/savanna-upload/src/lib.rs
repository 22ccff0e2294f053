//! Savanna upload pipeline
//!
//! Files go from the admin's machine straight to the media host: each one is
//! compressed, authorized with a fresh server-issued signature, posted to the
//! vendor and then registered as a photo. Batches run in small sequential
//! groups and collect per-file failures instead of aborting.

pub mod batch;
pub mod compression;
pub mod direct;
pub mod error;
pub mod file;
pub mod picker;
pub mod traits;

pub use batch::{BatchProgress, BatchSummary, BatchUploader, FileFailure, FileOutcome, FileStatus};
pub use compression::compress;
pub use direct::DirectUploader;
pub use error::UploadError;
pub use file::{FileSource, PendingFile};
pub use picker::{
    AssetPicker, CategoryFilter, HomepageDraft, PickError, PickerTarget, SettingsDraft,
    SlideDraft,
};
pub use traits::{AssetUploader, RecordSink, SignatureProvider};
