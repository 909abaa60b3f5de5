//! Repository traits
//!
//! Defines the storage seams used by the HTTP layer; `oldvrs-db` provides
//! the SQLite implementations.

use crate::error::AppError;
use crate::models::{AppSettings, Cdr, Folder};
use crate::query::CdrQuery;
use async_trait::async_trait;

/// Read-only access to call records
#[async_trait]
pub trait CdrRepository: Send + Sync {
    /// Count every row in the table
    async fn count_all(&self) -> Result<i64, AppError>;

    /// Run the count statement of a lookup
    async fn count_matching(&self, query: &CdrQuery) -> Result<i64, AppError>;

    /// Run the page statement of a lookup
    async fn fetch_page(&self, query: &CdrQuery) -> Result<Vec<Cdr>, AppError>;
}

/// Settings and recording folders
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Read the settings row, default when the table is empty
    async fn settings(&self) -> Result<AppSettings, AppError>;

    /// Set the dataset display name
    async fn update_display_name(&self, name: &str) -> Result<(), AppError>;

    /// List folders ordered by folder id
    async fn list_folders(&self) -> Result<Vec<Folder>, AppError>;

    /// Change a folder's path; returns false when no such folder exists
    async fn update_folder(&self, folder_id: i64, datapath: &str) -> Result<bool, AppError>;
}
