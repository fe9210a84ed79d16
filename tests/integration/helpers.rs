//! Test helpers and utilities

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tempfile::TempDir;
use tokio::task::JoinHandle;

use resource_probe::config::{ReporterConfig, ReporterMode};
use resource_probe::observability::Metrics;
use resource_probe::probe::ProbeJob;
use resource_probe::reporter;
use resource_probe::server::Server;

/// Probe job short enough for tests.
pub fn quick_job() -> ProbeJob {
    ProbeJob::new(Duration::from_millis(50), 2)
}

/// Server running in-process on an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub metrics: Arc<Metrics>,
    /// Fake cgroup v1 tree, removed on drop.
    pub cgroup: TempDir,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a limits-mode server over an empty cgroup tree.
    pub async fn limits() -> Self {
        Self::start(ReporterMode::Limits, quick_job()).await
    }

    /// Start a probe-mode server with [`quick_job`].
    pub async fn probe() -> Self {
        Self::start(ReporterMode::Probe, quick_job()).await
    }

    pub async fn start(mode: ReporterMode, job: ProbeJob) -> Self {
        let cgroup = TempDir::new().expect("Failed to create cgroup dir");
        let config = ReporterConfig {
            mode,
            cgroup_root: cgroup.path().to_path_buf(),
        };

        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let router = reporter::build_router_with_job(&config, job, Arc::clone(&metrics));

        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let server = Server::bind(addr, router, Arc::clone(&metrics))
            .await
            .expect("Failed to bind test server");
        let base_url = format!("http://{}", server.local_addr());

        let handle = tokio::spawn(async move {
            let _ = server.run().await;
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            metrics,
            cgroup,
            handle,
        }
    }

    /// Write a control file relative to the cgroup root.
    pub fn write_cgroup(&self, rel: &str, content: &str) {
        write_file(self.cgroup.path(), rel, content);
    }

    /// Make a GET request to the server
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Make a POST request with an empty body
    pub async fn post(&self, path: &str) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET and return status plus body text
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let resp = self.get(path).await;
        let status = resp.status();
        let body = resp.text().await.expect("Failed to read body");
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Assert that response has expected status
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Assert that response contains header with prefix
pub fn assert_header_starts_with(response: &Response, name: &str, prefix: &str) {
    let value = response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Header '{}' not found", name))
        .to_str()
        .unwrap();
    assert!(
        value.starts_with(prefix),
        "Header '{}' expected to start with '{}', got '{}'",
        name,
        prefix,
        value
    );
}

/// Assert that response body contains substring
pub async fn assert_body_contains(response: Response, substring: &str) {
    let body = response.text().await.expect("Failed to read body");
    assert!(
        body.contains(substring),
        "Body does not contain '{}'. Body: {}",
        substring,
        &body[..body.len().min(500)]
    );
}
