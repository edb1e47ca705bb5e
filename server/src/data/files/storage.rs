//! File storage trait definition
//!
//! Defines the interface for binary storage backends. Files are addressed by
//! a flat, server-generated name; callers never pass client-supplied paths.

use async_trait::async_trait;

use super::error::FileStorageError;

/// Trait for file storage backends
///
/// All implementations must be thread-safe (Send + Sync) for use in async contexts.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store a file under `name`, replacing any existing content
    async fn store(&self, name: &str, data: &[u8]) -> Result<(), FileStorageError>;

    /// Retrieve a file, or `NotFound`
    async fn get(&self, name: &str) -> Result<Vec<u8>, FileStorageError>;

    /// Delete a file. Does not fail if the file doesn't exist.
    async fn delete(&self, name: &str) -> Result<(), FileStorageError>;
}
