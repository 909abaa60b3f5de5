//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Values come from built-in defaults, an optional config file, `OLDVRS__`
//! environment variables and finally command-line overrides supplied by the binary.

use crate::error::AppError;
use config::{Config, ConfigError, Environment, File, Value};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub lookup: LookupConfig,
    pub web: WebConfig,

    /// Verbose logging and SQL echo in lookup pages
    #[serde(default)]
    pub debug: bool,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Base URL opened in the browser once the server is ready
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Whether to open the browser at all
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_start_url() -> String {
    "http://localhost".to_string()
}

fn default_open_browser() -> bool {
    true
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Path of the SQLite file holding cdrs, folders and params
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_db_path() -> String {
    "cdrs.db".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

/// Lookup page configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    /// Rows per results page
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Table holding the call records
    #[serde(default = "default_table")]
    pub table: String,

    /// Column names inside `table`
    #[serde(default)]
    pub columns: CdrColumns,

    /// Recording URL template; `{folder}` and `{id}` are substituted
    #[serde(default = "default_recording_template")]
    pub recording_template: String,

    /// URL prefix a folder is mounted under; `{folder}` is substituted
    #[serde(default = "default_folder_prefix")]
    pub folder_prefix: String,
}

fn default_page_size() -> i64 {
    15
}

fn default_table() -> String {
    "cdrs".to_string()
}

fn default_recording_template() -> String {
    "/cdr{folder}/{{id}}.osf".to_string()
}

fn default_folder_prefix() -> String {
    "/cdr{folder}".to_string()
}

/// Column names of the call record table
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CdrColumns {
    pub id: String,
    pub direction: String,
    pub duration: String,
    pub connected: String,
    pub caller: String,
    pub callee: String,
    pub folder: String,
}

impl Default for CdrColumns {
    fn default() -> Self {
        Self {
            id: "cdrid".to_string(),
            direction: "direction".to_string(),
            duration: "duration".to_string(),
            connected: "connected".to_string(),
            caller: "aphone".to_string(),
            callee: "bphone".to_string(),
            folder: "folderid".to_string(),
        }
    }
}

impl CdrColumns {
    fn all(&self) -> [&str; 7] {
        [
            &self.id,
            &self.direction,
            &self.duration,
            &self.connected,
            &self.caller,
            &self.callee,
            &self.folder,
        ]
    }
}

/// Static content configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    /// Directory holding `htmlhead.html` and `htmllookup.html`
    #[serde(default = "default_dir")]
    pub template_dir: String,

    /// Directory served at `/`
    #[serde(default = "default_dir")]
    pub static_dir: String,
}

fn default_dir() -> String {
    ".".to_string()
}

impl AppConfig {
    /// Load configuration, then apply `(key, value)` overrides on top
    ///
    /// `file` replaces the `config/default` and `config/{RUN_MODE}` lookup.
    /// Keys use the dotted form, e.g. `server.port`.
    pub fn load_with_overrides(
        file: Option<&str>,
        overrides: Vec<(&str, Value)>,
    ) -> Result<Self, AppError> {
        let mut builder = Self::defaults()?;

        builder = match file {
            Some(path) => builder.add_source(File::with_name(path)),
            None => {
                let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
                builder
                    .add_source(File::with_name("config/default").required(false))
                    .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            }
        };

        // Environment variables with OLDVRS__ prefix, e.g. OLDVRS__SERVER__PORT
        builder = builder.add_source(
            Environment::with_prefix("OLDVRS")
                .separator("__")
                .try_parsing(true),
        );

        for (key, value) in overrides {
            builder = builder.set_override(key, value)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        Self::load_with_overrides(Some(path), Vec::new())
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("server.workers", default_workers() as i64)?
            .set_default("server.start_url", default_start_url())?
            .set_default("server.open_browser", default_open_browser())?
            .set_default("database.path", default_db_path())?
            .set_default("database.max_connections", i64::from(default_max_connections()))?
            .set_default("database.acquire_timeout_secs", default_acquire_timeout() as i64)?
            .set_default("lookup.page_size", default_page_size())?
            .set_default("lookup.table", default_table())?
            .set_default("lookup.recording_template", default_recording_template())?
            .set_default("lookup.folder_prefix", default_folder_prefix())?
            .set_default("web.template_dir", default_dir())?
            .set_default("web.static_dir", default_dir())?
            .set_default("debug", false)
    }

    /// Reject values the rest of the program relies on being sane
    ///
    /// Table and column names end up in SQL text, so they must be plain identifiers.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.workers < 1 {
            return Err(AppError::Config(
                "server.workers must be at least 1".to_string(),
            ));
        }

        if self.lookup.page_size < 1 {
            return Err(AppError::Config(format!(
                "lookup.page_size must be positive, got {}",
                self.lookup.page_size
            )));
        }

        for name in std::iter::once(self.lookup.table.as_str()).chain(self.lookup.columns.all()) {
            if !is_identifier(name) {
                return Err(AppError::Config(format!(
                    "{:?} is not a valid SQL identifier",
                    name
                )));
            }
        }

        if !self.lookup.folder_prefix.starts_with('/') {
            return Err(AppError::Config(
                "lookup.folder_prefix must start with '/'".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// URL opened in the browser after startup
    pub fn browser_url(&self) -> String {
        format!("{}:{}", self.server.start_url, self.server.port)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
