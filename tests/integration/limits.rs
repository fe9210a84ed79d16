//! Limits mode tests (/cpu, /memory from cgroup v1 files)

use crate::helpers::*;
use reqwest::StatusCode;

#[tokio::test]
async fn test_cpu_limit_half_core() {
    let server = TestServer::limits().await;
    server.write_cgroup("cpu/cpu.cfs_quota_us", "50000\n");
    server.write_cgroup("cpu/cpu.cfs_period_us", "100000\n");

    let resp = server.get("/cpu").await;
    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "text/plain");
    assert_eq!(resp.text().await.unwrap(), "CPU limit: 0.50 cores\n");
}

#[tokio::test]
async fn test_cpu_unlimited() {
    let server = TestServer::limits().await;
    server.write_cgroup("cpu/cpu.cfs_quota_us", "-1\n");
    server.write_cgroup("cpu/cpu.cfs_period_us", "100000\n");

    let (status, body) = server.get_text("/cpu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "No CPU limit\n");
}

#[tokio::test]
async fn test_cpu_limit_missing_files() {
    let server = TestServer::limits().await;

    let resp = server.get("/cpu").await;
    assert_status(&resp, StatusCode::INTERNAL_SERVER_ERROR);
    assert_body_contains(resp, "Error getting CPU limit: ").await;
}

#[tokio::test]
async fn test_cpu_limit_garbage() {
    let server = TestServer::limits().await;
    server.write_cgroup("cpu/cpu.cfs_quota_us", "abc\n");
    server.write_cgroup("cpu/cpu.cfs_period_us", "100000\n");

    let (status, body) = server.get_text("/cpu").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error getting CPU limit: "));
    assert!(body.contains("abc"));
}

#[tokio::test]
async fn test_memory_limit() {
    let server = TestServer::limits().await;
    server.write_cgroup("memory/memory.limit_in_bytes", "536870912\n");

    let (status, body) = server.get_text("/memory").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Memory limit: 536870912 bytes\n");
}

#[tokio::test]
async fn test_memory_limit_missing() {
    let server = TestServer::limits().await;

    let (status, body) = server.get_text("/memory").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error getting memory limit: "));
}

/// Values are read on every request, never cached
#[tokio::test]
async fn test_limits_read_fresh() {
    let server = TestServer::limits().await;
    server.write_cgroup("memory/memory.limit_in_bytes", "1024\n");
    let (_, first) = server.get_text("/memory").await;

    server.write_cgroup("memory/memory.limit_in_bytes", "2048\n");
    let (_, second) = server.get_text("/memory").await;

    assert_eq!(first, "Memory limit: 1024 bytes\n");
    assert_eq!(second, "Memory limit: 2048 bytes\n");
}

#[tokio::test]
async fn test_read_errors_counted() {
    let server = TestServer::limits().await;

    let _ = server.get("/memory").await;
    let _ = server.get("/cpu").await;

    assert_eq!(server.metrics.resource_read_errors_total.get(), 2.0);
}
