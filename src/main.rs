//! OldVRs server
//!
//! Serves the CDR lookup and settings pages for a voice recorder's SQLite
//! database, plus the recordings themselves from each configured folder.

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use config::Value;
use oldvrs_api::{
    configure_config, configure_health, configure_lookup, mounts, render::UNNAMED_DATASET,
    AppState,
};
use oldvrs_core::{format::format_thousands, AppConfig};
use oldvrs_db::create_pool;
use std::env;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Browse call detail records and play their recordings
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// HTTP port [default: 80]
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file [default: cdrs.db]
    #[arg(long)]
    db: Option<String>,

    /// Base URL opened in the browser [default: http://localhost]
    #[arg(long)]
    url: Option<String>,

    /// Rows per results page [default: 15]
    #[arg(long)]
    pg: Option<i64>,

    /// Verbose logging and SQL echo in lookup pages
    #[arg(long)]
    debug: bool,

    /// Don't open a browser once the server is up
    #[arg(long)]
    no_browser: bool,

    /// Configuration file used instead of config/default
    #[arg(short, long)]
    config: Option<String>,
}

impl Args {
    /// Command-line values, applied over every other configuration source
    fn overrides(&self) -> Vec<(&'static str, Value)> {
        let mut overrides = Vec::new();

        if let Some(port) = self.port {
            overrides.push(("server.port", Value::from(i64::from(port))));
        }
        if let Some(db) = &self.db {
            overrides.push(("database.path", Value::from(db.as_str())));
        }
        if let Some(url) = &self.url {
            overrides.push(("server.start_url", Value::from(url.as_str())));
        }
        if let Some(pg) = self.pg {
            overrides.push(("lookup.page_size", Value::from(pg)));
        }
        if self.debug {
            overrides.push(("debug", Value::from(true)));
        }
        if self.no_browser {
            overrides.push(("server.open_browser", Value::from(false)));
        }

        overrides
    }
}

/// Initialize tracing/logging
fn init_tracing(debug: bool) {
    let log_level = if debug {
        "debug".to_string()
    } else {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "oldvrs={0},oldvrs_api={0},oldvrs_db={0},oldvrs_core={0},actix_web=info,sqlx=warn",
            log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = AppConfig::load_with_overrides(args.config.as_deref(), args.overrides())
        .context("Invalid configuration")?;

    init_tracing(config.debug);

    info!(
        "Starting OldVRs v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env::consts::ARCH
    );

    let pool = create_pool(
        &config.database.path,
        Some(config.database.max_connections),
        Some(config.database.acquire_timeout_secs),
    )
    .await
    .with_context(|| format!("Cannot open database {}", config.database.path))?;

    let state = AppState::from_pool(pool, &config);
    state
        .templates
        .verify()
        .context("Page templates are missing")?;

    let settings = state.settings.settings().await?;
    info!("Dataset: {}", settings.display_name(UNNAMED_DATASET));

    let total = state.cdrs.count_all().await?;
    info!("{} CDRs", format_thousands(total));

    let folders = state.settings.list_folders().await?;
    mounts::announce_folders(&folders);

    let bind_addr = config.server_addr();
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, config.server.workers
    );

    let paths = state.paths.clone();
    let static_dir = config.web.static_dir.clone();
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(TracingLogger::default())
            .configure(configure_health)
            .configure(configure_lookup)
            .configure(configure_config)
            .configure(|cfg| mounts::mount_folders(cfg, &folders, &paths))
            // catch-all, must stay last
            .configure(|cfg| mounts::mount_static(cfg, &static_dir))
    })
    .workers(config.server.workers)
    .bind(&bind_addr)
    .with_context(|| format!("Cannot bind {}", bind_addr))?
    .run();

    if config.server.open_browser {
        let url = config.browser_url();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = webbrowser::open(&url) {
                warn!("Could not open a browser at {}: {}", url, e);
            }
        });
    }

    server.await?;

    Ok(())
}
