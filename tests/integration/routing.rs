//! Routing tests (unknown paths, methods)

use crate::helpers::*;
use reqwest::StatusCode;

#[tokio::test]
async fn test_unknown_path() {
    let server = TestServer::limits().await;

    let resp = server.get("/disk").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
    assert_body_contains(resp, "Not Found").await;
}

#[tokio::test]
async fn test_post_not_allowed() {
    let server = TestServer::limits().await;

    let resp = server.post("/cpu").await;
    assert_status(&resp, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_query_string_ignored() {
    let server = TestServer::limits().await;
    server.write_cgroup("memory/memory.limit_in_bytes", "4096\n");

    let (status, body) = server.get_text("/memory?verbose=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Memory limit: 4096 bytes\n");
}

#[tokio::test]
async fn test_unmatched_routes_share_label() {
    let server = TestServer::limits().await;

    let _ = server.get("/a").await;
    let _ = server.get("/b").await;

    let output = server.metrics.export().unwrap();
    assert!(output.contains("route=\"other\""));
    assert!(!output.contains("route=\"/a\""));
}
