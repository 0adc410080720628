//! Middleware layer.
//!
//! A middleware runs around a downstream handler: it sees the request first,
//! decides what to log, and hands the request on. Two variants ship with the
//! crate:
//!
//! | Name | Type | Behavior |
//! |---|---|---|
//! | `quiet` | [`Quiet`] | logs the request path |
//! | `verbose` | [`Verbose`] | logs the path, then path + elapsed time once the handler is done |
//!
//! [`StatefulMiddleware`] owns a registry of variants and the one currently
//! in force, and can be told to switch while requests are being served.
//!
//! Access-log records use the target [`ACCESS_TARGET`], so they can be
//! filtered separately: `RUST_LOG=switchback=warn,switchback::access=info`.

use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;

mod quiet;
mod stateful;
mod verbose;

#[cfg(test)]
#[path = "../../tests/common/capture.rs"]
pub(crate) mod capture;

pub use quiet::Quiet;
pub use stateful::{Registry, StatefulMiddleware};
pub use verbose::Verbose;

/// `tracing` target of every access-log record.
pub const ACCESS_TARGET: &str = "switchback::access";

/// Registry name of [`Quiet`].
pub const QUIET: &str = "quiet";

/// Registry name of [`Verbose`].
pub const VERBOSE: &str = "verbose";

/// Behavior that runs around a downstream handler.
///
/// `call` receives the request and the handler to delegate to, and returns
/// the future of the combined work. Implementors must always delegate to
/// `next`; they only observe.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: BoxedHandler) -> BoxFuture;
}

/// Wrap `next` in `middleware`, producing a new handler.
///
/// ```rust
/// use std::sync::Arc;
/// use switchback::middleware::{self, Quiet};
/// use switchback::{Request, Response, handler};
///
/// async fn hello(_req: Request) -> Response { Response::text("hello") }
///
/// let wrapped = middleware::wrap(Arc::new(Quiet), handler::boxed(hello));
/// ```
pub fn wrap(middleware: Arc<dyn Middleware>, next: BoxedHandler) -> BoxedHandler {
    Arc::new(Wrapped { middleware, next })
}

struct Wrapped {
    middleware: Arc<dyn Middleware>,
    next: BoxedHandler,
}

impl ErasedHandler for Wrapped {
    fn call(&self, req: Request) -> BoxFuture {
        self.middleware.call(req, Arc::clone(&self.next))
    }
}

#[cfg(test)]
pub(crate) fn get(uri: &str) -> Request {
    http::Request::get(uri).body(bytes::Bytes::new()).unwrap().into()
}
