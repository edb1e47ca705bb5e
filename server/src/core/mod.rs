//! Core application infrastructure

pub(crate) mod banner;
pub mod cli;
pub mod config;
pub mod constants;
pub mod shutdown;
pub mod storage;

pub use crate::app::CoreApp;
pub use cli::{CliConfig, Commands};
pub use config::{AppConfig, AuthConfig, ServerConfig, StorageConfig};
pub use storage::{AppStorage, DataSubdir};

pub use crate::data::TransactionalService;

pub use shutdown::ShutdownService;
