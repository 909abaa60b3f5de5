//! Health check

use crate::state::AppState;
use actix_web::{
    web::{self, Data},
    HttpResponse,
};
use oldvrs_core::AppError;
use serde_json::json;

/// Service status and the number of stored CDRs
///
/// # Errors
///
/// Returns error if the database cannot be queried.
pub async fn health_check(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let cdrs = state.cdrs.count_all().await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "oldvrs",
        "version": env!("CARGO_PKG_VERSION"),
        "cdrs": cdrs,
    })))
}

/// Register the health route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
