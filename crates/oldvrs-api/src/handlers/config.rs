//! Settings page handlers
//!
//! Shows the display name and folder paths and applies submitted changes.
//! Folder mounts are fixed at startup, so a changed path only takes effect
//! after a restart.

use crate::dto::{merge_fields, query_config, ConfigSubmission, Fields};
use crate::render::config_form;
use crate::state::AppState;
use actix_web::{
    web::{self, Data, Form, Query},
    Error, HttpResponse,
};
use oldvrs_core::{AppError, AppResult};
use tracing::{info, instrument, warn};

/// Notice shown after a submission changed something
pub const UPDATED_NOTICE: &str = "Settings updated. Restart to serve recordings from changed folders.";

/// Settings page, applying any submitted fields
///
/// # Errors
///
/// Returns error if the form body is unreadable, a template cannot be read
/// or a database statement fails.
#[instrument(skip_all)]
pub async fn config_page(
    query: Query<Fields>,
    body: Result<Form<Fields>, Error>,
    state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let fields = merge_fields(query, body)?;
    apply_and_render(&state, &fields).await
}

async fn apply_and_render(state: &AppState, pairs: &[(String, String)]) -> AppResult<HttpResponse> {
    let submission = ConfigSubmission::from_pairs(pairs);
    let mut updated = false;

    if let Some(name) = &submission.dbname {
        state.settings.update_display_name(name).await?;
        updated = true;
    }

    for (folder_id, datapath) in &submission.folders {
        if state.settings.update_folder(*folder_id, datapath).await? {
            updated = true;
        } else {
            warn!("Config submitted unknown folder {}", folder_id);
        }
    }

    if updated {
        info!("Configuration updated");
    }

    let settings = state.settings.settings().await?;
    let folders = state.settings.list_folders().await?;

    let mut body = state.templates.head().await?;
    body.push_str(&config_form(
        &settings,
        &folders,
        updated.then_some(UPDATED_NOTICE),
    ));

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Register the settings routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/config")
            .app_data(query_config())
            .route(web::get().to(config_page))
            .route(web::post().to(config_page)),
    );
}
