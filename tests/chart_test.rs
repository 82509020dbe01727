use axum::body::Body;
use axum::http::{Request, StatusCode};
use bouncer_charts::api::chart::AppState;
use bouncer_charts::config::Config;
use bouncer_charts::server::build_router;
use bouncer_charts::storage::{julian, schema};
use chrono::NaiveDate;
use duckdb::Connection;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

/// Rows as `(day of January 2009, product, language, os, downloads)`.
const ROWS: &[(u32, &str, &str, &str, i64)] = &[
    (1, "OOo", "en-US", "win_x86", 10),
    (1, "OOo", "ja", "linux_x86", 5),
    (2, "OOo", "en-US", "winwjre", 12),
    (2, "OOo-dev", "de", "macosxintel", 4),
    (3, "OOo-dev", "en-US", "solarissparc", 3),
    (15, "OOo", "ja", "freebsd", 6),
    (31, "OOo", "en-US", "linuxx86-64", 2),
];

/// Write the rows to a DuckDB file, then serve it read-only like production.
fn make_test_state() -> (Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bouncer.duckdb");
    let config = Config {
        database_path: Some(path.clone()),
        ..Config::default()
    };

    {
        let conn = Connection::open(&path).unwrap();
        schema::init_schema(&conn, &config.table_name).unwrap();
        for (day, product, language, os, downloads) in ROWS {
            let jd = julian::to_jd(NaiveDate::from_ymd_opt(2009, 1, *day).unwrap());
            conn.execute(
                "INSERT INTO bouncer_stats VALUES (?, ?, ?, ?, ?)",
                duckdb::params![jd, *product, *language, *os, *downloads],
            )
            .unwrap();
        }
    }

    let conn = schema::open_database(Some(&path), &config.table_name).unwrap();
    (Arc::new(AppState::new(conn, config)), dir)
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, String) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn post(state: &Arc<AppState>, form: &str) -> (StatusCode, String) {
    let response = build_router(Arc::clone(state))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chart")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn error_message(body: &str) -> String {
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    json["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_count_over_whole_table() {
    let (state, _dir) = make_test_state();
    let (status, body) = get(
        &state,
        "/chart?type=count&start_year=2009&start_month=1&start_day=1&end_year=2009&end_month=1&end_day=31",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>OpenOffice.org Bouncer statistics</title>"));
    assert!(body.contains("<body>\n    42\n  </body>"));
}

#[tokio::test]
async fn test_count_with_repeated_filters() {
    let (state, _dir) = make_test_state();
    let (_, body) = get(
        &state,
        "/chart?type=count&start_date=2009-01-01&end_date=2009-01-31&language=en-US&language=ja&product=OOo",
    )
    .await;
    assert!(body.contains("<body>\n    35\n  </body>"));
}

#[tokio::test]
async fn test_all_marker_matches_no_filter() {
    let (state, _dir) = make_test_state();
    let base = "/chart?type=line_by_language&start_date=2009-01-01&end_date=2009-01-31";
    let (_, plain) = get(&state, base).await;
    let (_, with_all) = get(&state, &format!("{base}&os=ALL&os=linux_x86&product=ALL")).await;
    assert_eq!(plain, with_all);
}

#[tokio::test]
async fn test_pie_by_os_groups_families() {
    let (state, _dir) = make_test_state();
    let (status, body) = get(
        &state,
        "/chart?type=pie_by_os&start_date=2009-01-01&end_date=2009-01-01",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<svg"));
    assert!(body.contains("Windows (66.7%)"));
    assert!(body.contains("Linux (33.3%)"));
    assert!(!body.contains("win_x86"));
}

#[tokio::test]
async fn test_pie_by_oswa_keeps_raw_values() {
    let (state, _dir) = make_test_state();
    let (status, body) = get(
        &state,
        "/chart?type=pie_by_oswa&start_date=2009-01-01&end_date=2009-01-02",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("win_x86"));
    assert!(body.contains("winwjre"));
    assert!(body.contains("macosxintel"));
}

#[tokio::test]
async fn test_line_by_product() {
    let (state, _dir) = make_test_state();
    let (status, body) = get(
        &state,
        "/chart?type=line_by_product&start_date=2009-01-01&end_date=2009-01-31",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("OOo-dev"));
    assert!(body.contains("2009/01/01"));
    assert!(body.contains("2009/01/04"));
    assert!(body.contains("Download counts a day"));
}

#[tokio::test]
async fn test_swapped_dates_render_the_same_chart() {
    let (state, _dir) = make_test_state();
    let (_, forward) = get(
        &state,
        "/chart?type=line_by_os&start_date=2009-01-02&end_date=2009-01-15",
    )
    .await;
    let (_, backward) = get(
        &state,
        "/chart?type=line_by_os&start_date=2009-01-15&end_date=2009-01-02",
    )
    .await;
    assert_eq!(forward, backward);
}

#[tokio::test]
async fn test_post_form_matches_get() {
    let (state, _dir) = make_test_state();
    let query = "type=pie_by_language&start_date=2009-01-01&end_date=2009-01-31&product=OOo";
    let (get_status, via_get) = get(&state, &format!("/chart?{query}")).await;
    let (post_status, via_post) = post(&state, query).await;
    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(post_status, StatusCode::OK);
    assert_eq!(via_get, via_post);
}

#[tokio::test]
async fn test_start_after_last_day_rejected() {
    let (state, _dir) = make_test_state();
    let (status, body) = get(
        &state,
        "/chart?type=count&start_date=2009-02-01&end_date=2009-02-05",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "you specified the date after 2009-01-31.");
}

#[tokio::test]
async fn test_start_before_first_day_rejected() {
    let (state, _dir) = make_test_state();
    let (status, body) = get(
        &state,
        "/chart?type=count&start_date=2008-12-31&end_date=2009-01-05",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "you specified the date before 2009-01-01.");
}

#[tokio::test]
async fn test_invalid_type_rejected() {
    let (state, _dir) = make_test_state();
    let (status, body) = get(
        &state,
        "/chart?type=bar_by_product&start_date=2009-01-01&end_date=2009-01-31",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "Invalid argument for 'type': bar_by_product"
    );
}

#[tokio::test]
async fn test_non_numeric_date_is_internal_error() {
    let (state, _dir) = make_test_state();
    let (status, body) = get(
        &state,
        "/chart?type=count&start_year=abc&start_month=1&start_day=1&end_date=2009-01-31",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "Internal server error");
}

#[tokio::test]
async fn test_read_only_database_survives_many_requests() {
    let (state, _dir) = make_test_state();
    let uri = "/chart?type=count&start_date=2009-01-01&end_date=2009-01-31";
    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = Arc::clone(&state);
        handles.push(tokio::spawn(async move { get(&state, uri).await }));
    }
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<body>\n    42\n  </body>"));
    }
}
