#![allow(clippy::float_cmp)]

use serde_json::json;
use tracker::drive::Direction;

use super::*;
use crate::history::LogKind;
use crate::test_helpers::mock;

#[tokio::test]
async fn set_target_point_posts_coordinate() {
    let mut backend = mock().start().await;
    let api = BackendApi::new(&backend.config()).expect("client");

    api.set_target_point(GridCoord::new(1.2, 0.5)).await.expect("submit");

    let req = backend.next_request().await;
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/rssi/target_coordinate");
    assert_eq!(req.body, json!({ "x": 1.2, "y": 0.5 }));
}

#[tokio::test]
async fn set_target_point_ignores_response_body() {
    let backend = mock().respond("/rssi/target_coordinate", 200, json!({ "whatever": [1, 2, 3] })).start().await;
    let api = BackendApi::new(&backend.config()).expect("client");
    api.set_target_point(GridCoord::new(0.0, 0.0)).await.expect("submit");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let backend = mock().respond("/rssi/target_coordinate", 503, json!({ "detail": "planner offline" })).start().await;
    let api = BackendApi::new(&backend.config()).expect("client");

    let err = api.set_target_point(GridCoord::new(1.0, 1.0)).await.expect_err("503 should fail");
    match err {
        ConsoleError::Status { path, status, body } => {
            assert_eq!(path, "/rssi/target_coordinate");
            assert_eq!(status, 503);
            assert!(body.contains("planner offline"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn drive_posts_command_and_passes_reply_through() {
    let mut backend = mock().respond("/motor/drive", 200, json!({ "ok": true })).start().await;
    let api = BackendApi::new(&backend.config()).expect("client");

    let reply = api.drive(DriveCommand { direction: Direction::A, enable: true }).await.expect("drive");
    assert_eq!(reply, json!({ "ok": true }));

    let req = backend.next_request().await;
    assert_eq!(req.path, "/motor/drive");
    assert_eq!(req.body, json!({ "direction": "a", "enable": true }));
}

#[tokio::test]
async fn start_navigation_gets_start_endpoint() {
    let mut backend = mock().respond("/rssi/start", 200, json!({ "status": "started" })).start().await;
    let api = BackendApi::new(&backend.config()).expect("client");

    let reply = api.start_navigation().await.expect("start");
    assert_eq!(reply["status"], "started");

    let req = backend.next_request().await;
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/rssi/start");
}

#[tokio::test]
async fn fetch_logs_sends_day_and_page() {
    let page = json!({
        "data": [{ "timestamp": "2025-10-17T08:30:00", "status": "MCU", "text": "Device A connected." }],
        "total_pages": 4
    });
    let mut backend = mock().respond("/logs/", 200, page).start().await;
    let api = BackendApi::new(&backend.config()).expect("client");

    let logs = api.fetch_logs("2025-10-17", 2).await.expect("logs");
    assert_eq!(logs.total_pages, 4);
    assert_eq!(logs.data.len(), 1);
    assert_eq!(logs.data[0].status, LogKind::Mcu);

    let req = backend.next_request().await;
    assert_eq!(req.path, "/logs/");
    assert_eq!(req.query.as_deref(), Some("day=2025-10-17&page=2"));
}

#[tokio::test]
async fn fetch_monitoring_unwraps_data() {
    let body = json!({ "data": [{
        "timestamp": "2025-10-17T08:00:00",
        "rssi1": [-65.0], "rssi2": [-60.0], "rssi3": [-70.0],
        "variance1": 25.0, "variance2": 20.0, "variance3": 30.0,
        "median1": -65.0, "median2": -60.0, "median3": -70.0,
        "mean1": -65.5, "mean2": -60.5, "mean3": -70.5
    }]});
    let mut backend = mock().respond("/monitoring/", 200, body).start().await;
    let api = BackendApi::new(&backend.config()).expect("client");

    let records = api.fetch_monitoring("2025-10-17").await.expect("monitoring");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].mean1, -65.5);

    let req = backend.next_request().await;
    assert_eq!(req.query.as_deref(), Some("date=2025-10-17"));
}

#[tokio::test]
async fn malformed_logs_body_is_an_error() {
    let backend = mock().respond("/logs/", 200, json!({ "data": "nope" })).start().await;
    let api = BackendApi::new(&backend.config()).expect("client");
    assert!(matches!(api.fetch_logs("2025-10-17", 1).await, Err(ConsoleError::Http(_))));
}

#[tokio::test]
async fn unreachable_backend_is_an_http_error() {
    let mut config = ConsoleConfig::for_backend("http://127.0.0.1:9").expect("config");
    config.request_timeout = std::time::Duration::from_secs(2);
    let api = BackendApi::new(&config).expect("client");
    assert!(matches!(api.start_navigation().await, Err(ConsoleError::Http(_))));
}
