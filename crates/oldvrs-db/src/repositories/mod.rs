//! Repository implementations
//!
//! Concrete implementations of the repository traits defined in
//! oldvrs-core, using sqlx for SQLite access.

pub mod cdr_repo;
pub mod config_repo;

pub use cdr_repo::SqliteCdrRepository;
pub use config_repo::SqliteConfigRepository;
