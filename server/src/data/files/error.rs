//! File storage error types

use thiserror::Error;

/// Errors from low-level file storage operations
#[derive(Error, Debug)]
pub enum FileStorageError {
    #[error("File not found: {name}")]
    NotFound { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid stored file name: {0}")]
    InvalidName(String),
}

/// Errors from the high-level file service
#[derive(Error, Debug)]
pub enum FileServiceError {
    #[error("File not found: {name}")]
    NotFound { name: String },

    #[error("Storage error: {0}")]
    Storage(FileStorageError),

    #[error("File too large: {size} bytes (max: {max})")]
    TooLarge { size: u64, max: u64 },
}

impl From<FileStorageError> for FileServiceError {
    fn from(e: FileStorageError) -> Self {
        match e {
            FileStorageError::NotFound { name } => Self::NotFound { name },
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_not_found_display() {
        let err = FileStorageError::NotFound {
            name: "abc.pdf".to_string(),
        };
        assert_eq!(err.to_string(), "File not found: abc.pdf");
    }

    #[test]
    fn test_file_service_too_large_display() {
        let err = FileServiceError::TooLarge {
            size: 20_000_000,
            max: 10_485_760,
        };
        assert_eq!(
            err.to_string(),
            "File too large: 20000000 bytes (max: 10485760)"
        );
    }

    #[test]
    fn test_not_found_is_lifted() {
        let err: FileServiceError = FileStorageError::NotFound {
            name: "x".to_string(),
        }
        .into();
        assert!(matches!(err, FileServiceError::NotFound { .. }));

        let io_err = std::io::Error::other("disk full");
        let err: FileServiceError = FileStorageError::from(io_err).into();
        assert!(matches!(err, FileServiceError::Storage(_)));
    }
}
