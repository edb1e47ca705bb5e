//! Domain logic shared by the HTTP routes and the CLI
//!
//! - `accounts` - registration, credential checks and password changes
//! - `audit` - best-effort audit trail writes
//! - `counters` - best-effort platform and per-user counter bumps

pub mod accounts;
pub mod audit;
pub mod counters;

pub use accounts::AccountError;
pub use audit::AuditAction;
