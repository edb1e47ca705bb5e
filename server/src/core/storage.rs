//! Data directory management
//!
//! Layout under the configured data directory:
//!
//! | Subdir | Contents |
//! |--------|----------|
//! | `db/` | SQLite database (unless a database URL is configured) |
//! | `uploads/` | Uploaded document binaries, one file per stored name |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::config::AppConfig;
use super::constants::SQLITE_DB_FILENAME;

/// Data subdirectories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSubdir {
    Database,
    Uploads,
}

impl DataSubdir {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataSubdir::Database => "db",
            DataSubdir::Uploads => "uploads",
        }
    }

    /// Returns subdirectories that should always be created.
    pub const fn all() -> &'static [DataSubdir] {
        &[DataSubdir::Database, DataSubdir::Uploads]
    }
}

/// Application storage manager
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
}

impl AppStorage {
    /// Initialize storage under the configured data directory
    pub async fn init(config: &AppConfig) -> Result<Self> {
        let data_dir = config.storage.data_dir.clone();

        // Create directories first (canonicalize requires path to exist)
        Self::ensure_directories(&data_dir).await?;

        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);
        tracing::debug!(data_dir = %data_dir.display(), "Storage initialized");

        Ok(Self { data_dir })
    }

    async fn ensure_directories(data_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        for subdir in DataSubdir::all() {
            let path = data_dir.join(subdir.as_str());
            tokio::fs::create_dir_all(&path).await.with_context(|| {
                format!(
                    "Failed to create {} directory: {}",
                    subdir.as_str(),
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to a subdirectory (canonicalized)
    pub fn subdir(&self, subdir: DataSubdir) -> PathBuf {
        let path = self.data_dir.join(subdir.as_str());
        path.canonicalize().unwrap_or(path)
    }

    /// SQLite URL for the default database file
    pub fn default_database_url(&self) -> String {
        let path = self.subdir(DataSubdir::Database).join(SQLITE_DB_FILENAME);
        format!("sqlite://{}", path.display())
    }

    /// Create AppStorage for testing with a specific data directory
    #[cfg(test)]
    pub fn init_for_test(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}
