//! Data storage layer
//!
//! Provides storage services for the application:
//! - `sqlite` - Transactional database for accounts, documents and taxonomy
//! - `files` - Document binaries kept on disk under generated names
//! - `types` - Row and parameter types shared by repositories and routes
//! - `traits` - Repository trait the routes are written against
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod files;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteService;

pub use error::DataError;

pub use traits::TransactionalRepository;

use std::sync::Arc;

/// Transactional database service
///
/// Wraps the backend-specific service. Services are stored as Arc so the
/// repository handle can be cloned cheaply into request handlers.
pub enum TransactionalService {
    /// SQLite backend (embedded)
    Sqlite(Arc<SqliteService>),
}

impl TransactionalService {
    /// Initialize the transactional service from a database URL
    pub async fn init(url: &str) -> Result<Self, DataError> {
        let service = SqliteService::init(url).await?;
        Ok(Self::Sqlite(Arc::new(service)))
    }

    /// Fresh in-memory database with the schema applied
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        Self::Sqlite(Arc::new(SqliteService::from_pool(
            sqlite::test_pool().await,
        )))
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &sqlx::SqlitePool {
        match self {
            Self::Sqlite(s) => s.pool(),
        }
    }

    /// Run a WAL checkpoint
    pub async fn checkpoint(&self) -> Result<(), DataError> {
        match self {
            Self::Sqlite(s) => s.checkpoint().await.map_err(Into::into),
        }
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
        }
    }

    /// Get the repository trait object for data operations
    pub fn repository(&self) -> Box<dyn TransactionalRepository + Send + Sync> {
        match self {
            Self::Sqlite(s) => Box::new(Arc::clone(s)),
        }
    }
}
