//! HTTP server.
//!
//! A single accept loop on a socket2-built listener. Each connection is
//! served by hyper's HTTP/1 connection driver on its own task, requests
//! are dispatched through the [`Router`].

mod error;
pub mod internal;
pub mod response;
pub mod routing;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming as IncomingBody;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::observability::{Metrics, UNMATCHED_ROUTE};

pub use error::ServerError;
pub use internal::{HealthHandler, MetricsHandler};
pub use response::Reply;
pub use routing::{Handler, Router};

const LISTEN_BACKLOG: i32 = 1024;

/// Per-request state shared by every connection.
struct ConnectionContext {
    router: Arc<Router>,
    metrics: Arc<Metrics>,
    access_log_enabled: bool,
}

/// Resource reporter HTTP server.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
    metrics: Arc<Metrics>,
    access_log_enabled: bool,
}

impl Server {
    /// Bind the listener. Must be called inside a tokio runtime.
    pub async fn bind(
        addr: SocketAddr,
        router: Router,
        metrics: Arc<Metrics>,
    ) -> Result<Self, ServerError> {
        let std_listener =
            create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        let listener = TcpListener::from_std(std_listener)?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            router,
            metrics,
            access_log_enabled: false,
        })
    }

    /// Enable access logging (`target: "access"` events).
    pub fn with_access_log(mut self, enabled: bool) -> Self {
        self.access_log_enabled = enabled;
        self
    }

    /// Address the listener is bound to. Reflects the OS-assigned port
    /// when bound to port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until the future is dropped.
    ///
    /// Accept failures are logged and the loop continues.
    pub async fn run(self) -> Result<(), ServerError> {
        info!(
            "Server listening on http://{} (routes: {})",
            self.local_addr,
            self.router.paths().join(", ")
        );

        let ctx = Arc::new(ConnectionContext {
            router: Arc::new(self.router),
            metrics: self.metrics,
            access_log_enabled: self.access_log_enabled,
        });

        loop {
            let (stream, remote_addr) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Accept error: {}", e);
                    continue;
                }
            };

            let _ = stream.set_nodelay(true);

            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move {
                ctx.serve_connection(stream, remote_addr).await;
            });
        }
    }
}

impl ConnectionContext {
    async fn serve_connection(self: Arc<Self>, stream: TcpStream, remote_addr: SocketAddr) {
        let ctx = Arc::clone(&self);
        let service = service_fn(move |req| {
            let ctx = Arc::clone(&ctx);
            async move { ctx.handle_request(req, remote_addr).await }
        });

        let io = TokioIo::new(stream);
        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            let err_str = format!("{:?}", err);
            if !is_connection_error(&err_str) {
                debug!("Connection error: {:?}", err);
            }
        }
    }

    async fn handle_request(
        &self,
        req: Request<IncomingBody>,
        remote_addr: SocketAddr,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let reply = self.router.dispatch(&method, &path).await;
        let status = reply.status.as_u16();
        let elapsed = start.elapsed();

        let route = self.router.matched_route(&path).unwrap_or(UNMATCHED_ROUTE);
        self.metrics
            .record_http_request(route, status, elapsed.as_secs_f64());

        if self.access_log_enabled {
            info!(
                target: "access",
                method = %method,
                path = %path,
                status = status,
                duration_ms = elapsed.as_secs_f64() * 1000.0,
                ip = %remote_addr.ip(),
                ""
            );
        }

        Ok(reply.into_response())
    }
}

/// Create a non-blocking listener with SO_REUSEADDR.
fn create_listener(addr: SocketAddr) -> std::io::Result<std::net::TcpListener> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(socket.into())
}

/// Client-side disconnects that are not worth logging.
fn is_connection_error(err_str: &str) -> bool {
    err_str.contains("connection reset")
        || err_str.contains("broken pipe")
        || err_str.contains("Connection reset")
        || err_str.contains("os error 104")
        || err_str.contains("os error 32")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_connection_error() {
        assert!(is_connection_error("Os { code: 104, message: \"os error 104\" }"));
        assert!(is_connection_error("broken pipe"));
        assert!(!is_connection_error("invalid HTTP method parsed"));
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let server = Server::bind("127.0.0.1:0".parse().unwrap(), Router::new(), metrics)
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let result = Server::bind(addr, Router::new(), metrics).await;
        match result {
            Err(ServerError::Bind { addr: failed, .. }) => assert_eq!(failed, addr),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("bind should fail on a port in use"),
        }
    }
}
