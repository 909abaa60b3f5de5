//! OldVRs Core Library
//!
//! This crate provides the foundational types for the OldVRs call browser.
//! It includes:
//!
//! - Domain models (CDR rows, recording folders, settings)
//! - Display formatting for durations, dates and counts
//! - The lookup filter and the parameterized query builder
//! - Repository traits implemented by `oldvrs-db`
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod models;
pub mod query;
pub mod traits;

pub use config::AppConfig;
pub use error::{AppError, FormatError};
pub use filter::{CdrFilter, RawLookupParams};
pub use query::{BindValue, CdrQuery, CdrQueryBuilder, PageLinks};

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
