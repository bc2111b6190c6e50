use adiz_dashboard::build_dashboard;
use adiz_dashboard::config::{Config, SourceMode};
use adiz_dashboard::server::{app_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const CSV: &str = "日期,共機架次,進入AIDZ共機架次,共艦架次\n\
2024/1/1,8,2,1\n\
2024/1/2,10,3,1\n\
2024/1/5,4,0,6\n";

fn router_for(path: &Path) -> Router {
    let mut config = Config::default();
    config.source.mode = SourceMode::Local;
    config.source.local_path = path.to_path_buf();
    app_router(AppState::new(build_dashboard(&config)))
}

fn fixture() -> (TempDir, Router) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mnd.csv");
    fs::write(&path, CSV).unwrap();
    let router = router_for(&path);
    (dir, router)
}

async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(router, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_source() {
    let (_dir, router) = fixture();
    let (status, body) = get_json(router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["source"]["mode"], "local");
}

#[tokio::test]
async fn dashboard_json_with_blank_query_values() {
    let (_dir, router) = fixture();
    let (status, body) = get_json(router, "/api/dashboard?start=&end=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["as_of"], "2024-01-05");
    assert_eq!(body["summary"]["row_count"], 3);
    assert_eq!(body["bounds"]["start"], "2024-01-01");
    assert_eq!(body["table"][0]["date_str"], "2024-01-05");
}

#[tokio::test]
async fn series_follows_range() {
    let (_dir, router) = fixture();
    let (status, body) = get_json(router, "/api/series?start=2024-01-01&end=2024-01-02").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dates"], serde_json::json!(["2024-01-02", "2024-01-01"]));
    assert_eq!(body["total_aircraft"], serde_json::json!([10, 8]));
}

#[tokio::test]
async fn empty_range_is_ok() {
    let (_dir, router) = fixture();
    let (status, body) = get_json(router, "/api/dashboard?start=2020-01-01&end=2020-02-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["row_count"], 0);
    assert!(body["summary"]["as_of"].is_null());
    assert!(body["summary"]["metrics"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m["value"].is_null() && m["delta"] == 0));
}

#[tokio::test]
async fn invalid_date_is_bad_request() {
    let (_dir, router) = fixture();
    let (status, body) = get_json(router, "/api/dashboard?start=someday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid start date 'someday'");
}

#[tokio::test]
async fn export_download_headers_and_bom() {
    let (_dir, router) = fixture();
    let (status, headers, body) = get(router, "/api/export.csv?start=2024-01-02").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"mnd_filtered_data.csv\""
    );
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(body.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(body[3..].to_vec()).unwrap();
    assert_eq!(
        text,
        "date_str,total_aircraft,enter_adiz,ships\n2024-01-05,4,0,6\n2024-01-02,10,3,1\n"
    );
}

#[tokio::test]
async fn report_lists_rejections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mnd.csv");
    fs::write(&path, format!("{CSV}garbage,1,1,1\n")).unwrap();

    let (status, body) = get_json(router_for(&path), "/api/report").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows_read"], 4);
    assert_eq!(body["rows_kept"], 3);
    assert_eq!(body["rejections"][0]["reason"]["kind"], "unparseable_date");
}

#[tokio::test]
async fn missing_source_is_bad_gateway() {
    let dir = tempdir().unwrap();
    let router = router_for(&dir.path().join("absent.csv"));
    let (status, body) = get_json(router, "/api/dashboard").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Data source not found:"));
}

#[tokio::test]
async fn html_page_renders_view_and_errors() {
    let (_dir, router) = fixture();
    let (status, _, body) = get(router, "/?start=2024-01-01&end=2024-01-02").await;
    let html = String::from_utf8(body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("2024-01-02"));
    assert!(html.contains("+2 vs previous day"));
    assert!(html.contains("min=\"2024-01-01\""));
    // chart positions points by date and marks each day, so gaps stay visible
    assert!(html.contains("Date.parse"));
    assert!(html.contains("'circle'"));

    let dir = tempdir().unwrap();
    let router = router_for(&dir.path().join("absent.csv"));
    let (status, _, body) = get(router, "/").await;
    let html = String::from_utf8(body).unwrap();
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains("Could not load data."));
    assert!(!html.contains("<table"));
}

#[tokio::test]
async fn html_page_bad_date_has_its_own_heading() {
    let (_dir, router) = fixture();
    let (status, _, body) = get(router, "/?start=someday").await;
    let html = String::from_utf8(body).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(html.contains("Invalid date range."));
    assert!(html.contains("someday"));
    assert!(!html.contains("Could not load data."));
}

#[tokio::test]
async fn html_page_carries_source_attribution() {
    let (_dir, router) = fixture();
    let (_, _, body) = get(router, "/").await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("資料來源：<strong>國防部即時軍事動態</strong>"));
    assert!(html.contains("本網頁偵測之數字來自國防部每天發布之公告"));
}

#[tokio::test]
async fn html_page_shows_empty_state() {
    let (_dir, router) = fixture();
    let (status, _, body) = get(router, "/?start=2020-01-01&end=2020-01-31").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("No data in range."));
}
