//! Request routing.
//!
//! Routes are plain data: an exact path mapped to a shared [`Handler`].
//! A [`Router`] is built once at startup and moved into the [`Server`],
//! there is no global registration.
//!
//! [`Server`]: super::Server

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;

use super::response::Reply;

/// A route endpoint.
///
/// Handlers are read-only diagnostics: they take no request input and
/// render a complete [`Reply`].
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self) -> Reply;

    /// Name used in logs.
    fn name(&self) -> &'static str;
}

/// Exact-path request router.
#[derive(Clone, Default)]
pub struct Router {
    routes: HashMap<&'static str, Arc<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `path`, replacing any previous handler.
    pub fn route<H: Handler + 'static>(self, path: &'static str, handler: H) -> Self {
        self.route_shared(path, Arc::new(handler))
    }

    /// Register an already shared handler.
    pub fn route_shared(mut self, path: &'static str, handler: Arc<dyn Handler>) -> Self {
        self.routes.insert(path, handler);
        self
    }

    /// Registered route matching `path` exactly.
    pub fn matched_route(&self, path: &str) -> Option<&'static str> {
        self.routes.get_key_value(path).map(|(route, _)| *route)
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.routes.keys().copied().collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatch a request.
    ///
    /// Unknown paths get 404. Known paths accept only GET and HEAD,
    /// anything else gets 405.
    pub async fn dispatch(&self, method: &Method, path: &str) -> Reply {
        let Some(handler) = self.routes.get(path) else {
            return Reply::not_found();
        };

        if method != Method::GET && method != Method::HEAD {
            return Reply::method_not_allowed();
        }

        tracing::trace!(handler = handler.name(), path, "dispatching");
        handler.handle().await
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.paths())
            .finish()
    }
}
