use std::time::Instant;

use tracing::info;

use super::{ACCESS_TARGET, Middleware};
use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;

/// Logs the request path on the way in, and the path with the elapsed time
/// on the way out.
///
/// The second record comes from [`Timing`]'s `Drop`, so it is written however
/// the downstream handler exits: normal return, panic, or the request future
/// being dropped mid-flight.
#[derive(Clone, Copy, Debug, Default)]
pub struct Verbose;

impl Middleware for Verbose {
    fn call(&self, req: Request, next: BoxedHandler) -> BoxFuture {
        let path = req.request_uri().to_owned();
        info!(target: ACCESS_TARGET, path = %path, "request started");

        let timing = Timing { path, started: Instant::now() };
        let fut = next.call(req);
        Box::pin(async move {
            let _timing = timing;
            fut.await
        })
    }
}

/// Emits the completion record when dropped.
struct Timing {
    path: String,
    started: Instant,
}

impl Drop for Timing {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        info!(target: ACCESS_TARGET, path = %self.path, ?elapsed, "request finished");
    }
}
