use tracing::info;

use super::{ACCESS_TARGET, Middleware};
use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;

/// Logs the request path and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quiet;

impl Middleware for Quiet {
    fn call(&self, req: Request, next: BoxedHandler) -> BoxFuture {
        info!(target: ACCESS_TARGET, path = req.request_uri(), "request");
        next.call(req)
    }
}
