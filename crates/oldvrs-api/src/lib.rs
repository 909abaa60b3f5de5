//! HTTP layer for OldVRs
//!
//! Lookup and settings pages, the shared request state and the static file
//! mounts for recordings.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]

pub mod dto;
pub mod handlers;
pub mod mounts;
pub mod render;
pub mod state;
pub mod templates;

pub use handlers::{configure_config, configure_health, configure_lookup};
pub use state::AppState;
pub use templates::Templates;
