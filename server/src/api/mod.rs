//! API server and routes

pub mod auth;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
mod server;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;

pub use auth::AuthManager;
pub use server::{ApiServer, RouterContext, build_router};
