//! API route handlers

pub mod admin;
pub mod auth;
pub mod documents;
pub mod health;
pub mod logs;
pub mod statistics;
pub mod users;
