//! OldVRs Database Layer
//!
//! This crate provides SQLite access and repository implementations for the
//! call browser. It includes:
//!
//! - Connection pool management with sqlx
//! - The CDR repository executing lookup queries with bound parameters
//! - The settings/folder repository backing the config page

pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_pool_with_options};
pub use repositories::*;

// Re-export commonly used types
pub use oldvrs_core::{AppError, AppResult};
pub use sqlx::{Sqlite, SqlitePool};
