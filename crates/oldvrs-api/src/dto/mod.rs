//! Data Transfer Objects (DTOs) for form submissions

pub mod config;
pub mod fields;

pub use config::*;
pub use fields::{merge_fields, query_config, Fields};
