//! Health and metrics endpoint tests (/health, /metrics)

use crate::helpers::*;
use reqwest::StatusCode;

/// Test /health endpoint returns JSON
#[tokio::test]
async fn test_health_returns_json() {
    let server = TestServer::limits().await;
    let resp = server.get("/health").await;

    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "application/json");

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["mode"], "limits");
}

#[tokio::test]
async fn test_health_probe_mode() {
    let server = TestServer::probe().await;

    let json: serde_json::Value = server.get("/health").await.json().await.unwrap();
    assert_eq!(json["mode"], "probe");
}

/// Test /metrics returns Prometheus format
#[tokio::test]
async fn test_metrics_prometheus_format() {
    let server = TestServer::limits().await;
    server.write_cgroup("memory/memory.limit_in_bytes", "1024\n");
    let _ = server.get("/memory").await;

    let resp = server.get("/metrics").await;
    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "text/plain");

    let body = resp.text().await.unwrap();
    assert!(body.contains("# TYPE resource_probe_http_requests_total counter"));
    assert!(body.contains("route=\"/memory\""));
    assert!(body.contains("resource_probe_http_request_duration_seconds"));
}
