//! # switchback
//!
//! A minimal HTTP service whose request middleware can be swapped while it
//! is serving traffic.
//!
//! ## The contract
//!
//! Two endpoints, one moving part:
//!
//! - `/` answers `{"ok":true}`.
//! - `/config` takes `{"option":"quiet"}` or `{"option":"verbose"}` and
//!   switches the middleware that wraps *every* request from then on.
//!
//! The moving part is [`middleware::StatefulMiddleware`]: a frozen registry
//! of variants plus one atomically swappable "active" slot. Each request
//! reads the slot once, lock-free, so a switch takes effect immediately and
//! a request never sees half of one variant and half of another.
//!
//! The rest is plumbing in the same spirit:
//!
//! - Radix-tree routing via [`matchit`], paths matched for any method
//! - hyper for HTTP/1.1 and HTTP/2, tokio for I/O
//! - Graceful shutdown on SIGTERM / Ctrl-C, draining in-flight requests
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switchback::middleware::{Registry, StatefulMiddleware};
//! use switchback::{Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), switchback::Error> {
//!     let stateful = Arc::new(StatefulMiddleware::new("quiet", Registry::builtin())?);
//!     Server::bind(([0, 0, 0, 0], 8080)).serve(app(stateful)).await
//! }
//! ```
//!
//! ```text
//! curl localhost:8080/                                   # {"ok":true}
//! curl -d '{"option":"verbose"}' localhost:8080/config   # {"changed":true}
//! curl -d '{"option":"bogus"}' localhost:8080/config     # 400 invalid middleware name
//! ```

mod config;
mod error;
mod request;
mod response;
mod router;
mod server;
mod service;

pub mod handler;
pub mod middleware;

pub use config::{Config, DEFAULT_PORT};
pub use error::Error;
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use service::{ConfigureError, Service, app, status};
