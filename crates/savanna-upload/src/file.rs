use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::UploadError;

/// A file selected for upload, held in memory until it is sent.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub name: String,
    pub bytes: Bytes,
    /// Size reported when the file was selected. The batch size gate uses this.
    pub declared_size: u64,
    pub content_type: Option<String>,
}

impl PendingFile {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let bytes = bytes.into();
        Self {
            content_type: guess_content_type(&name).map(str::to_string),
            declared_size: bytes.len() as u64,
            name,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(file_name(path), bytes))
    }

    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = size;
        self
    }

    pub fn size(&self) -> u64 {
        self.declared_size
    }
}

/// Where a batch entry's bytes come from. Files on disk are only stat'ed up front
/// and read once their group starts, so the size gate never loads them.
#[derive(Debug)]
pub enum FileSource {
    Memory(PendingFile),
    Disk {
        name: String,
        path: PathBuf,
        size: u64,
    },
    /// `stat` failed. The batch reports it like any other per-file failure.
    Unreadable {
        name: String,
        error: std::io::Error,
    },
}

impl FileSource {
    pub async fn stat(path: &Path) -> Self {
        let name = file_name(path);
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => FileSource::Disk {
                name,
                path: path.to_path_buf(),
                size: meta.len(),
            },
            Ok(_) => FileSource::Unreadable {
                name,
                error: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            },
            Err(error) => FileSource::Unreadable { name, error },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileSource::Memory(file) => &file.name,
            FileSource::Disk { name, .. } | FileSource::Unreadable { name, .. } => name,
        }
    }

    /// Declared size, unknown when the file could not be stat'ed.
    pub fn size(&self) -> Option<u64> {
        match self {
            FileSource::Memory(file) => Some(file.size()),
            FileSource::Disk { size, .. } => Some(*size),
            FileSource::Unreadable { .. } => None,
        }
    }

    /// Reads the bytes of a file on disk.
    pub async fn load(self) -> Result<PendingFile, UploadError> {
        match self {
            FileSource::Memory(file) => Ok(file),
            FileSource::Disk { path, .. } => PendingFile::from_path(&path).await,
            FileSource::Unreadable { error, .. } => Err(UploadError::Io(error)),
        }
    }
}

impl From<PendingFile> for FileSource {
    fn from(file: PendingFile) -> Self {
        FileSource::Memory(file)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Content type from the file extension, for the multipart part header.
pub fn guess_content_type(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_path_reads_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Portrait.JPG");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let file = PendingFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "Portrait.JPG");
        assert_eq!(file.size(), 17);
        assert_eq!(file.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = PendingFile::from_path(Path::new("/nonexistent/a.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Io(_)));
    }

    #[tokio::test]
    async fn test_stat_does_not_read_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.jpg");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(64 * 1024 * 1024).unwrap();

        match FileSource::stat(&path).await {
            FileSource::Disk { name, size, .. } => {
                assert_eq!(name, "huge.jpg");
                assert_eq!(size, 64 * 1024 * 1024);
            }
            other => panic!("expected a file on disk, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stat_missing_file_is_unreadable() {
        let source = FileSource::stat(Path::new("/nonexistent/a.jpg")).await;
        assert_eq!(source.name(), "a.jpg");
        assert!(matches!(source.load().await, Err(UploadError::Io(_))));
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("a.png"), Some("image/png"));
        assert_eq!(guess_content_type("README"), None);
    }
}
