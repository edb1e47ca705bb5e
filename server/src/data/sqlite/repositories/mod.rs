//! SQLite repositories
//!
//! Types (UserRow, DocumentRow, etc.) should be imported from `crate::data::types`.

pub mod audit_log;
pub mod document;
pub mod major;
pub mod stats;
pub mod subject;
pub mod user;
