//! Probe mode tests (/cpu throughput, /memory usage)

use crate::helpers::*;
use reqwest::StatusCode;

#[tokio::test]
async fn test_cpu_usage_line() {
    let server = TestServer::probe().await;

    let resp = server.get("/cpu").await;
    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "text/plain");

    let body = resp.text().await.unwrap();
    assert!(body.starts_with("WORKER 2 CPU usage: "), "body: {}", body);
    assert!(body.ends_with(" operations per second\n"), "body: {}", body);

    // Throughput always carries two decimals
    let number = body
        .trim_start_matches("WORKER 2 CPU usage: ")
        .trim_end_matches(" operations per second\n");
    let decimals = number.rsplit('.').next().unwrap();
    assert_eq!(decimals.len(), 2, "number: {}", number);
}

#[tokio::test]
async fn test_concurrent_probes_complete() {
    let server = TestServer::probe().await;

    let (a, b) = tokio::join!(server.get("/cpu"), server.get("/cpu"));
    assert_status(&a, StatusCode::OK);
    assert_status(&b, StatusCode::OK);

    let output = server.metrics.export().unwrap();
    assert!(output.contains("resource_probe_probe_runs_total{status=\"success\"} 2"));
}

/// Health stays responsive while a probe is running
#[tokio::test]
async fn test_health_during_probe() {
    let server = TestServer::probe().await;

    let (cpu, health) = tokio::join!(server.get("/cpu"), server.get("/health"));
    assert_status(&cpu, StatusCode::OK);
    assert_status(&health, StatusCode::OK);
}

#[tokio::test]
async fn test_memory_usage_line() {
    let server = TestServer::probe().await;

    let (status, body) = server.get_text("/memory").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Memory usage: Alloc = "), "body: {}", body);
    assert!(body.ends_with(" MB\n"), "body: {}", body);

    #[cfg(target_os = "linux")]
    assert!(body.contains("TotalSystem = "), "body: {}", body);
}
