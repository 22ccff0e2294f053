//! Batch upload orchestration.
//!
//! Files over the size ceiling fail up front without any network call, and
//! files on disk are not read until their group starts. The rest are uploaded
//! in groups: every upload of a group runs concurrently and
//! the next group starts only once all of them have settled. Each file's result
//! is folded into a [`BatchSummary`]; one failure never stops its siblings.

use std::path::PathBuf;

use futures::stream::{FuturesUnordered, StreamExt};
use savanna_core::constants::{BATCH_GROUP_SIZE, MAX_UPLOAD_BYTES};
use savanna_core::models::{CreatePhotoRequest, Photo};
use uuid::Uuid;

use crate::error::UploadError;
use crate::file::{FileSource, PendingFile};
use crate::traits::{AssetUploader, RecordSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Uploaded { url: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub filename: String,
    pub status: FileStatus,
}

/// Emitted after every settled file.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub last: FileOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub success_count: usize,
    pub total_count: usize,
    pub uploaded: Vec<Photo>,
    pub failures: Vec<FileFailure>,
}

impl BatchSummary {
    fn new(total_count: usize) -> Self {
        Self {
            total_count,
            ..Default::default()
        }
    }

    fn completed(&self) -> usize {
        self.success_count + self.failures.len()
    }

    fn record(&mut self, filename: String, result: Result<Photo, UploadError>) -> FileOutcome {
        match result {
            Ok(photo) => {
                self.success_count += 1;
                let url = photo.image_url.clone();
                self.uploaded.push(photo);
                FileOutcome {
                    filename,
                    status: FileStatus::Uploaded { url },
                }
            }
            Err(err) => {
                let reason = err.to_string();
                self.failures.push(FileFailure {
                    filename: filename.clone(),
                    reason: reason.clone(),
                });
                FileOutcome {
                    filename,
                    status: FileStatus::Failed { reason },
                }
            }
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && self.success_count == self.total_count
    }

    /// `"3 of 5 files uploaded"`
    pub fn message(&self) -> String {
        format!(
            "{} of {} files uploaded",
            self.success_count, self.total_count
        )
    }
}

pub struct BatchUploader<U, R> {
    uploader: U,
    sink: R,
    group_size: usize,
    max_file_bytes: u64,
}

impl<U: AssetUploader, R: RecordSink> BatchUploader<U, R> {
    pub fn new(uploader: U, sink: R) -> Self {
        Self {
            uploader,
            sink,
            group_size: BATCH_GROUP_SIZE,
            max_file_bytes: MAX_UPLOAD_BYTES,
        }
    }

    /// Uploads `files` into `category_id` and reports every settled file to `on_progress`.
    pub async fn upload_batch<F>(
        &self,
        files: Vec<PendingFile>,
        category_id: Uuid,
        on_progress: F,
    ) -> BatchSummary
    where
        F: FnMut(&BatchProgress),
    {
        let sources = files.into_iter().map(FileSource::from).collect();
        self.run(sources, category_id, on_progress).await
    }

    /// Same as [`upload_batch`](Self::upload_batch) for files on disk. A path that
    /// cannot be stat'ed or read fails on its own.
    pub async fn upload_paths<F>(
        &self,
        paths: &[PathBuf],
        category_id: Uuid,
        on_progress: F,
    ) -> BatchSummary
    where
        F: FnMut(&BatchProgress),
    {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            sources.push(FileSource::stat(path).await);
        }
        self.run(sources, category_id, on_progress).await
    }

    #[tracing::instrument(skip(self, files, on_progress), fields(files = files.len()))]
    async fn run<F>(
        &self,
        files: Vec<FileSource>,
        category_id: Uuid,
        mut on_progress: F,
    ) -> BatchSummary
    where
        F: FnMut(&BatchProgress),
    {
        let mut summary = BatchSummary::new(files.len());

        let mut accepted = Vec::with_capacity(files.len());
        for file in files {
            match self.admit(file) {
                Ok(file) => accepted.push(file),
                Err((filename, err)) => {
                    let last = summary.record(filename, Err(err));
                    on_progress(&BatchProgress {
                        completed: summary.completed(),
                        total: summary.total_count,
                        last,
                    });
                }
            }
        }

        let mut remaining = accepted.into_iter().peekable();
        let mut group_index = 0;
        while remaining.peek().is_some() {
            let group: Vec<FileSource> = remaining.by_ref().take(self.group_size).collect();
            tracing::debug!(group = group_index, size = group.len(), "Starting upload group");

            let mut in_flight: FuturesUnordered<_> = group
                .into_iter()
                .map(|file| self.process(file, category_id))
                .collect();

            while let Some((filename, result)) = in_flight.next().await {
                if let Err(ref e) = result {
                    tracing::warn!(file = %filename, error = %e, "Upload failed");
                }
                let last = summary.record(filename, result);
                on_progress(&BatchProgress {
                    completed: summary.completed(),
                    total: summary.total_count,
                    last,
                });
            }
            group_index += 1;
        }

        tracing::info!(
            success = summary.success_count,
            total = summary.total_count,
            "Batch finished"
        );
        summary
    }

    /// Size gate, applied to the declared size before any bytes are read.
    fn admit(&self, file: FileSource) -> Result<FileSource, (String, UploadError)> {
        if let FileSource::Unreadable { name, error } = file {
            return Err((name, UploadError::Io(error)));
        }
        let size = file.size().unwrap_or_default();
        if size > self.max_file_bytes {
            let err = UploadError::TooLarge {
                size,
                max: self.max_file_bytes,
            };
            return Err((file.name().to_string(), err));
        }
        if size == 0 {
            return Err((file.name().to_string(), UploadError::Empty));
        }
        Ok(file)
    }

    async fn process(
        &self,
        file: FileSource,
        category_id: Uuid,
    ) -> (String, Result<Photo, UploadError>) {
        let filename = file.name().to_string();
        let result = match file.load().await {
            Ok(file) => self.upload_and_record(file, category_id).await,
            Err(err) => Err(err),
        };
        (filename, result)
    }

    async fn upload_and_record(
        &self,
        file: PendingFile,
        category_id: Uuid,
    ) -> Result<Photo, UploadError> {
        let asset = self.uploader.upload(file).await?;
        let request = CreatePhotoRequest {
            image_url: asset.secure_url.clone(),
            category_id,
            featured: false,
        };
        self.sink
            .record_photo(request)
            .await
            .map_err(|e| UploadError::Registry {
                url: asset.secure_url,
                message: e.to_string(),
            })
    }
}
