//! Document file storage
//!
//! Uploaded document binaries are kept outside the database, each under a
//! server-generated name. The database row stores that name; the client's
//! original file name is only metadata.
//!
//! ## Architecture
//!
//! - `storage` - Trait definition for file storage backends
//! - `filesystem` - Local filesystem implementation
//! - `error` - Error types for file operations
//!
//! ## Storage Layout
//!
//! ```text
//! {data_dir}/uploads/
//! └── {cuid2}.{ext}
//! ```

pub mod error;
pub mod filesystem;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use crate::core::config::StorageConfig;
use crate::core::storage::{AppStorage, DataSubdir};

pub use error::{FileServiceError, FileStorageError};
pub use filesystem::FilesystemStorage;
pub use storage::FileStorage;

/// Longest extension carried over from the original file name
const MAX_EXTENSION_LEN: usize = 10;

/// Service storing and serving document binaries
pub struct FileService {
    /// Storage backend
    storage: Arc<dyn FileStorage>,
    /// Maximum accepted file size in bytes
    max_bytes: u64,
}

impl FileService {
    /// Create a file service over `{data_dir}/uploads`
    pub fn new(config: &StorageConfig, app_storage: &AppStorage) -> Self {
        let uploads = app_storage.subdir(DataSubdir::Uploads);
        tracing::debug!(
            path = %uploads.display(),
            max_upload_bytes = config.max_upload_bytes,
            "File service initialized"
        );
        Self::with_storage(
            Arc::new(FilesystemStorage::new(uploads)),
            config.max_upload_bytes,
        )
    }

    /// Create a file service over an explicit backend
    pub fn with_storage(storage: Arc<dyn FileStorage>, max_bytes: u64) -> Self {
        Self { storage, max_bytes }
    }

    /// Maximum accepted file size in bytes
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Generate a unique stored name, keeping a sanitized extension of the original
    pub fn generate_name(original_name: &str) -> String {
        let id = cuid2::create_id();
        match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id,
        }
    }

    /// Store a document binary under a fresh name and return that name
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, FileServiceError> {
        let size = data.len() as u64;
        if size > self.max_bytes {
            return Err(FileServiceError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }

        let name = Self::generate_name(original_name);
        self.storage.store(&name, data).await?;
        Ok(name)
    }

    /// Read a stored document binary
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, FileServiceError> {
        Ok(self.storage.get(name).await?)
    }

    /// Best-effort removal of a stored binary; failures are logged, not returned
    pub async fn discard(&self, name: &str) {
        if let Err(e) = self.storage.delete(name).await {
            tracing::warn!(name, error = %e, "Failed to delete stored file");
        }
    }
}

fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext: String = Path::new(original_name)
        .extension()?
        .to_str()?
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        None
    } else {
        Some(ext)
    }
}
