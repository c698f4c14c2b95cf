//! Casting Agency API: actors and movies behind role-based JWT permissions.

pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

pub use app::{router, AppState};
