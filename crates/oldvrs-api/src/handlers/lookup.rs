//! CDR lookup handlers
//!
//! `GET` and `POST /lookup` read the filter from the form body and the query
//! string; the pagination buttons post back here with a new offset.

use crate::dto::{merge_fields, query_config, Fields};
use crate::render::{dataset_heading, LookupPage};
use crate::state::AppState;
use actix_web::{
    web::{self, Data, Form, Query},
    Error, HttpResponse,
};
use oldvrs_core::{
    filter::{CdrFilter, RawLookupParams},
    AppError, AppResult,
};
use tracing::{debug, info, instrument};

/// Lookup from query-string and form-body fields
///
/// # Errors
///
/// Returns error if the form body is unreadable, a template cannot be read
/// or a database query fails.
///
/// # Examples
///
/// ```text
/// GET /lookup?tel=0161&dates=range&fromdate=2021-03-01&todate=2021-03-05&offset=15
/// ```
#[instrument(skip_all)]
pub async fn lookup(
    query: Query<Fields>,
    body: Result<Form<Fields>, Error>,
    state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let fields = merge_fields(query, body)?;
    render_lookup(&state, RawLookupParams::from_pairs(&fields)).await
}

/// Filter, count, fetch one page and render it after the templates
pub async fn render_lookup(state: &AppState, raw: RawLookupParams) -> AppResult<HttpResponse> {
    let filter = CdrFilter::from_params(raw, state.page_size);
    let query = state.builder.build(&filter);

    debug!(
        "Lookup: number={:?}, from={:?}, to={:?}, offset={}",
        filter.number(),
        filter.from_bound(),
        filter.to_bound(),
        filter.offset()
    );

    let total = state.cdrs.count_matching(&query).await?;
    let rows = if total > 0 {
        state.cdrs.fetch_page(&query).await?
    } else {
        Vec::new()
    };

    let page = LookupPage::new(&filter, total, &rows, &state.paths);
    let settings = state.settings.settings().await?;

    let mut body = state.templates.head().await?;
    body.push_str(&dataset_heading(&settings));
    body.push_str(&state.templates.lookup_shell().await?);
    body.push_str(&page.to_html(state.debug.then_some(query.page_sql.as_str())));

    info!(
        "Lookup returned {} CDRs out of {} total",
        page.rows.len(),
        total
    );

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Register the lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/lookup")
            .app_data(query_config())
            .route(web::get().to(lookup))
            .route(web::post().to(lookup)),
    );
}
