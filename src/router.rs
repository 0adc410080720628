//! Radix-tree request router with global layers.
//!
//! Paths are matched regardless of method. A route that matches runs through
//! every installed layer before reaching its handler; a request that matches
//! nothing gets `404` and never touches a layer.

use std::sync::Arc;

use http::StatusCode;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// A global wrapper: takes the matched handler, returns the handler to run.
type Layer = Arc<dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync>;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
pub struct Router {
    routes: MatchitRouter<BoxedHandler>,
    layers: Vec<Layer>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: MatchitRouter::new(), layers: Vec::new() }
    }

    /// Register `handler` for `path`, any method. Returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or is already registered.
    pub fn route(mut self, path: &str, handler: impl Handler) -> Self {
        self.routes
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Install a wrapper applied to every matched handler, whenever it was
    /// registered. The first layer installed is the outermost.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use switchback::{Request, Response, Router};
    /// use switchback::middleware::{self, Quiet};
    ///
    /// async fn hello(_req: Request) -> Response { Response::text("hello") }
    ///
    /// let app = Router::new()
    ///     .route("/", hello)
    ///     .layer(|next| middleware::wrap(Arc::new(Quiet), next));
    /// ```
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
    {
        self.layers.push(Arc::new(layer));
        self
    }

    /// Route one request and produce its response.
    pub async fn handle(&self, req: Request) -> Response {
        match self.lookup(req.path()) {
            Some(handler) => handler.call(req).await,
            None => Response::status(StatusCode::NOT_FOUND),
        }
    }

    /// Find the handler for `path`, already wrapped in every layer.
    pub(crate) fn lookup(&self, path: &str) -> Option<BoxedHandler> {
        let matched = self.routes.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        Some(self.layers.iter().rev().fold(handler, |next, layer| layer(next)))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
