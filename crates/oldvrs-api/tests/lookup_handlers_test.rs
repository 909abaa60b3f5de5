//! Integration tests for the lookup and config handlers
//!
//! Each test runs the real routes against an in-memory SQLite database and a
//! temporary template directory.

use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use oldvrs_api::{configure_config, configure_health, configure_lookup, AppState, Templates};
use oldvrs_core::{config::CdrColumns, models::RecordingPaths, CdrQueryBuilder};
use oldvrs_db::{create_pool_with_options, SqliteCdrRepository, SqliteConfigRepository, SqlitePool};
use sqlx::sqlite::SqliteConnectOptions;
use std::{str::FromStr, sync::Arc};
use tempfile::TempDir;

const HEAD: &str = "<html><head><title>OldVRs</title></head><body>";
const SHELL: &str = "<form id=\"lookup\"></form>";
const ROW_MARKER: &str = "<tr><td class=\"duration\">";

async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    create_pool_with_options(options, 1).await.unwrap()
}

async fn seed(pool: &SqlitePool, cdr_count: usize) {
    for statement in [
        "CREATE TABLE cdrs (cdrid TEXT, direction TEXT, duration TEXT, connected TEXT, \
         aphone TEXT, bphone TEXT, folderid INTEGER)",
        "CREATE TABLE params (dbname TEXT)",
        "CREATE TABLE folders (folderid INTEGER PRIMARY KEY, datapath TEXT)",
        "INSERT INTO params VALUES ('Sales line')",
        "INSERT INTO folders VALUES (1, '/srv/vr1'), (2, '/srv/vr2')",
    ] {
        sqlx::query(statement).execute(pool).await.unwrap();
    }

    for i in 0..cdr_count {
        sqlx::query("INSERT INTO cdrs VALUES (?, 'O', '0:1:5', ?, '2001', ?, 1)")
            .bind(format!("ID{:03}", i))
            .bind(format!("2021-03-{:02}T10:00:00Z", i % 28 + 1))
            .bind(format!("0161496{:04}", i))
            .execute(pool)
            .await
            .unwrap();
    }
}

fn templates() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("htmlhead.html"), HEAD).unwrap();
    std::fs::write(dir.path().join("htmllookup.html"), SHELL).unwrap();
    dir
}

fn state(pool: SqlitePool, dir: &TempDir, debug: bool) -> AppState {
    let builder = CdrQueryBuilder::new("cdrs", CdrColumns::default());
    AppState {
        cdrs: Arc::new(SqliteCdrRepository::new(pool.clone(), builder.clone())),
        settings: Arc::new(SqliteConfigRepository::new(pool)),
        builder,
        paths: RecordingPaths::default(),
        templates: Templates::new(dir.path()),
        page_size: 15,
        debug,
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_lookup)
                .configure(configure_config)
                .configure(configure_health),
        )
        .await
    };
}

async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn test_first_page_of_unfiltered_lookup() {
    let pool = memory_pool().await;
    seed(&pool, 37).await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::get()
        .uri("/lookup?tel=&dates=all&fromdate=&todate=&offset=0")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );

    let body = body_text(resp).await;
    assert!(body.starts_with(HEAD));
    assert!(body.contains("<h2>Sales line</h2>"));
    assert!(body.contains(SHELL));
    assert!(body.contains("<p>Showing all calls; 37 found</p>"));
    assert_eq!(body.matches(ROW_MARKER).count(), 15);
    assert_eq!(body.matches("<form action=\"lookup\"").count(), 1);
    assert!(body.contains("name=\"offset\" value=\"15\""));
    assert!(body.contains("/cdr1/{ID000}.osf"));
    assert!(!body.contains("<!--"));
}

#[actix_web::test]
async fn test_last_page_via_posted_form() {
    let pool = memory_pool().await;
    seed(&pool, 37).await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::post()
        .uri("/lookup")
        .set_form([
            ("tel", ""),
            ("dates", "all"),
            ("fromdate", ""),
            ("todate", ""),
            ("offset", "30"),
        ])
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;

    assert_eq!(body.matches(ROW_MARKER).count(), 7);
    assert!(body.contains("/cdr1/{ID030}.osf"));
    assert_eq!(body.matches("<form action=\"lookup\"").count(), 1);
    assert!(body.contains("name=\"offset\" value=\"15\""));
}

#[actix_web::test]
async fn test_number_and_date_filter() {
    let pool = memory_pool().await;
    seed(&pool, 37).await;
    let dir = templates();
    let app = app!(state(pool, &dir, true));

    // rows 2 and 30 connect on 3 Mar; only row 30 has a number ending 0030
    let req = test::TestRequest::get()
        .uri("/lookup?tel=0030&dates=range&fromdate=2021-03-03&todate=2021-03-03")
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;

    assert!(body.contains("<p>Showing 0030; Call date 3 Mar 2021; 1 found</p>"));
    assert_eq!(body.matches(ROW_MARKER).count(), 1);
    assert!(body.contains("1m 5s "));
    assert!(body.contains("3 Mar 2021 10:00am Wed"));
    assert!(body.contains("<!-- SELECT"));
    assert!(!body.contains("<form action=\"lookup\""));
}

#[actix_web::test]
async fn test_no_matches_renders_empty_table() {
    let pool = memory_pool().await;
    seed(&pool, 5).await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::get()
        .uri("/lookup?tel=999999&dates=all")
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;

    assert!(body.contains("<p>Showing 999999; 0 found</p>"));
    assert!(body.contains("<tbody></tbody></table>"));
}

#[actix_web::test]
async fn test_storage_failure_is_a_json_error() {
    let pool = memory_pool().await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::get().uri("/lookup").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "database_error");
    assert_eq!(body["status"], 500);
}

#[actix_web::test]
async fn test_missing_template_is_an_error() {
    let pool = memory_pool().await;
    seed(&pool, 1).await;
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::get().uri("/lookup").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "template_error");
}

#[actix_web::test]
async fn test_config_page_lists_folders() {
    let pool = memory_pool().await;
    seed(&pool, 0).await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::get().uri("/config").to_request();
    let body = body_text(test::call_service(&app, req).await).await;

    assert!(body.starts_with(HEAD));
    assert!(body.contains("value=\"Sales line\""));
    assert!(body.contains("name=\"datapath\" value=\"/srv/vr1\""));
    assert!(body.contains("name=\"datapath\" value=\"/srv/vr2\""));
    assert!(!body.contains("class=\"notice\""));
}

#[actix_web::test]
async fn test_config_update_skips_empty_paths() {
    let pool = memory_pool().await;
    seed(&pool, 0).await;
    let dir = templates();
    let app = app!(state(pool.clone(), &dir, false));

    let req = test::TestRequest::post()
        .uri("/config")
        .set_form([
            ("dbname", "Support line"),
            ("folderid", "1"),
            ("datapath", ""),
            ("folderid", "2"),
            ("datapath", "/mnt/archive"),
        ])
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;

    assert!(body.contains("class=\"notice\""));
    assert!(body.contains("value=\"Support line\""));
    assert!(body.contains("name=\"datapath\" value=\"/srv/vr1\""));
    assert!(body.contains("name=\"datapath\" value=\"/mnt/archive\""));

    let paths: Vec<(i64, String)> =
        sqlx::query_as("SELECT folderid, datapath FROM folders ORDER BY folderid")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(
        paths,
        vec![(1, "/srv/vr1".to_string()), (2, "/mnt/archive".to_string())]
    );
}

#[actix_web::test]
async fn test_health_reports_cdr_count() {
    let pool = memory_pool().await;
    seed(&pool, 12).await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cdrs"], 12);
}

#[actix_web::test]
async fn test_post_with_query_string_fields_only() {
    let pool = memory_pool().await;
    seed(&pool, 37).await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::post()
        .uri("/lookup?tel=0161496&dates=all&offset=15")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_text(resp).await;
    assert!(body.contains("<p>Showing 0161496; 37 found</p>"));
    assert_eq!(body.matches(ROW_MARKER).count(), 15);
    assert!(body.contains("/cdr1/{ID015}.osf"));
    assert!(body.contains("name=\"offset\" value=\"0\""));
    assert!(body.contains("name=\"offset\" value=\"30\""));
}

#[actix_web::test]
async fn test_body_fields_win_over_query_string() {
    let pool = memory_pool().await;
    seed(&pool, 37).await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::post()
        .uri("/lookup?offset=0&tel=2001")
        .set_form([("dates", "all"), ("offset", "30")])
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;

    assert!(body.contains("<p>Showing 2001; 37 found</p>"));
    assert_eq!(body.matches(ROW_MARKER).count(), 7);
}

#[actix_web::test]
async fn test_oversized_form_body_is_invalid_input() {
    let pool = memory_pool().await;
    seed(&pool, 1).await;
    let dir = templates();
    let app = app!(state(pool, &dir, false));

    let req = test::TestRequest::post()
        .uri("/lookup")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(format!("tel={}", "1".repeat(64 * 1024)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn test_config_post_with_query_string_fields_only() {
    let pool = memory_pool().await;
    seed(&pool, 0).await;
    let dir = templates();
    let app = app!(state(pool.clone(), &dir, false));

    let req = test::TestRequest::post()
        .uri("/config?folderid=2&datapath=%2Fmnt%2Fquery")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_text(resp).await;
    assert!(body.contains("class=\"notice\""));
    assert!(body.contains("name=\"datapath\" value=\"/mnt/query\""));

    let (datapath,): (String,) = sqlx::query_as("SELECT datapath FROM folders WHERE folderid = 2")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(datapath, "/mnt/query");
}
