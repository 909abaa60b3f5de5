//! Shared application state
//!
//! Built once at startup and handed to every worker through `web::Data`.

use crate::templates::Templates;
use oldvrs_core::{
    models::RecordingPaths,
    query::CdrQueryBuilder,
    traits::{CdrRepository, ConfigRepository},
    AppConfig,
};
use oldvrs_db::{SqliteCdrRepository, SqliteConfigRepository, SqlitePool};
use std::sync::Arc;

/// State shared by the lookup and config handlers
#[derive(Clone)]
pub struct AppState {
    pub cdrs: Arc<dyn CdrRepository>,
    pub settings: Arc<dyn ConfigRepository>,
    pub builder: CdrQueryBuilder,
    pub paths: RecordingPaths,
    pub templates: Templates,
    /// Rows per lookup page
    pub page_size: i64,
    /// Echo the page SQL into lookup responses
    pub debug: bool,
}

impl AppState {
    /// Wire the SQLite repositories according to `config`
    pub fn from_pool(pool: SqlitePool, config: &AppConfig) -> Self {
        let builder = CdrQueryBuilder::from_config(&config.lookup);

        Self {
            cdrs: Arc::new(SqliteCdrRepository::new(pool.clone(), builder.clone())),
            settings: Arc::new(SqliteConfigRepository::new(pool)),
            builder,
            paths: RecordingPaths::new(
                config.lookup.folder_prefix.clone(),
                config.lookup.recording_template.clone(),
            ),
            templates: Templates::new(&config.web.template_dir),
            page_size: config.lookup.page_size,
            debug: config.debug,
        }
    }
}
