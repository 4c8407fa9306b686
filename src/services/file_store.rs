//! Storage for uploaded files (avatars, article covers, KYC scans, project documents).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Avatars,
    Articles,
    Kyc,
    Projects,
}

impl FileCategory {
    pub fn dir_name(self) -> &'static str {
        match self {
            FileCategory::Avatars => "avatars",
            FileCategory::Articles => "articles",
            FileCategory::Kyc => "kyc",
            FileCategory::Projects => "projects",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("File type .{0} is not allowed")]
    DisallowedType(String),

    #[error("File name has no extension")]
    MissingExtension,

    #[error("File is empty")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FileStoreError> for AppError {
    fn from(err: FileStoreError) -> Self {
        match err {
            FileStoreError::Io(e) => AppError::Storage(e.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// A file received from a client, held in memory until stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persists the file and returns the unique stored name.
    async fn store(
        &self,
        file: &UploadedFile,
        category: FileCategory,
    ) -> Result<String, FileStoreError>;

    /// Removes a stored file. Returns `false` when there was nothing to remove.
    async fn delete(&self, filename: &str, category: FileCategory) -> Result<bool, FileStoreError>;
}

/// Writes files under `<root>/<category>/`.
pub struct LocalFileStore {
    root: PathBuf,
    allowed_extensions: Vec<String>,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>, allowed_extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            allowed_extensions,
        }
    }

    pub fn path_for(&self, filename: &str, category: FileCategory) -> PathBuf {
        self.root.join(category.dir_name()).join(filename)
    }

    fn checked_extension(&self, original_name: &str) -> Result<String, FileStoreError> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or(FileStoreError::MissingExtension)?;
        if !self.allowed_extensions.iter().any(|allowed| allowed == &ext) {
            return Err(FileStoreError::DisallowedType(ext));
        }
        Ok(ext)
    }
}

/// `<uuid hex>_<YYYYMMDDHHMMSS>.<ext>`
fn unique_name(ext: &str) -> String {
    format!(
        "{}_{}.{}",
        Uuid::new_v4().simple(),
        Utc::now().format("%Y%m%d%H%M%S"),
        ext
    )
}

/// Stored names are flat; anything that could walk out of the category dir is refused.
fn is_plain_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && filename != "."
        && filename != ".."
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(
        &self,
        file: &UploadedFile,
        category: FileCategory,
    ) -> Result<String, FileStoreError> {
        let ext = self.checked_extension(&file.original_name)?;
        if file.bytes.is_empty() {
            return Err(FileStoreError::Empty);
        }

        let dir = self.root.join(category.dir_name());
        tokio::fs::create_dir_all(&dir).await?;

        let filename = unique_name(&ext);
        tokio::fs::write(dir.join(&filename), &file.bytes).await?;

        info!(
            category = category.dir_name(),
            filename = %filename,
            size = file.bytes.len(),
            "Stored upload"
        );
        Ok(filename)
    }

    async fn delete(&self, filename: &str, category: FileCategory) -> Result<bool, FileStoreError> {
        if !is_plain_name(filename) {
            debug!(filename = %filename, "Refusing to delete non-plain file name");
            return Ok(false);
        }
        match tokio::fs::remove_file(self.path_for(filename, category)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
