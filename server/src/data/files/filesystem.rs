//! Filesystem-based file storage implementation
//!
//! Stores every file directly under the base path: `{base_path}/{name}`.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::FileStorageError;
use super::storage::FileStorage;

/// Longest accepted stored name
const MAX_NAME_LEN: usize = 128;

/// Filesystem-based file storage
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    /// Base path for file storage
    base_path: PathBuf,
}

impl FilesystemStorage {
    /// Create a new filesystem storage with the given base path
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Resolve a stored name to a path, rejecting anything that could escape the base
    fn file_path(&self, name: &str) -> Result<PathBuf, FileStorageError> {
        let valid = !name.is_empty()
            && name.len() <= MAX_NAME_LEN
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(FileStorageError::InvalidName(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }
}

#[async_trait]
impl FileStorage for FilesystemStorage {
    async fn store(&self, name: &str, data: &[u8]) -> Result<(), FileStorageError> {
        let path = self.file_path(name)?;
        fs::create_dir_all(&self.base_path).await?;
        fs::write(&path, data).await?;

        tracing::debug!(
            name,
            size = data.len(),
            path = %path.display(),
            "File stored"
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Vec<u8>, FileStorageError> {
        let path = self.file_path(name)?;

        // Read directly; map ENOENT to NotFound instead of checking first
        fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FileStorageError::NotFound {
                    name: name.to_string(),
                }
            } else {
                FileStorageError::Io(e)
            }
        })
    }

    async fn delete(&self, name: &str) -> Result<(), FileStorageError> {
        let path = self.file_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(name, "File deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_get_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(temp_dir.path().join("uploads"));

        storage.store("abc123.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(storage.get("abc123.pdf").await.unwrap(), b"%PDF-1.4");

        storage.delete("abc123.pdf").await.unwrap();
        assert!(matches!(
            storage.get("abc123.pdf").await,
            Err(FileStorageError::NotFound { .. })
        ));

        // Deleting a missing file is not an error
        storage.delete("abc123.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_traversal_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(temp_dir.path().to_path_buf());

        for name in ["../etc/passwd", "a/b.pdf", ".hidden", "", "a\\b"] {
            assert!(
                matches!(
                    storage.store(name, b"x").await,
                    Err(FileStorageError::InvalidName(_))
                ),
                "accepted {:?}",
                name
            );
        }
    }
}
