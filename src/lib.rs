//! LocalLibrary Catalog Server
//!
//! A Rust implementation of the LocalLibrary catalog, providing a REST JSON
//! API for books, authors, genres, languages, physical copies, and per-user
//! loan tracking.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
