//! HTTP request handlers

pub mod config;
pub mod health;
pub mod lookup;

pub use config::configure as configure_config;
pub use health::configure as configure_health;
pub use lookup::configure as configure_lookup;
pub use lookup::render_lookup;
