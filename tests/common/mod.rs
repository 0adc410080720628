//! Shared utilities for the end-to-end tests.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use switchback::middleware::{ACCESS_TARGET, QUIET, Registry, StatefulMiddleware};
use switchback::{Error, Router, Server, app};

mod capture;

pub use capture::Capture;

/// A server on an ephemeral port, stopped through its shutdown channel.
pub struct TestServer {
    pub base: String,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Signals shutdown and waits for the drain to finish.
    pub async fn stop(self) -> Result<(), Error> {
        let _ = self.shutdown.send(());
        self.handle.await.expect("server task panicked")
    }
}

/// Serve `router` on `127.0.0.1:0`.
pub async fn spawn(router: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(Server::serve_with(listener, router, async {
        let _ = rx.await;
    }));
    TestServer { base: format!("http://{addr}"), shutdown: tx, handle }
}

/// Serve the real application, starting in quiet mode.
pub async fn spawn_app() -> (TestServer, Arc<StatefulMiddleware>) {
    let stateful = Arc::new(StatefulMiddleware::new(QUIET, Registry::builtin()).unwrap());
    (spawn(app(Arc::clone(&stateful))).await, stateful)
}

/// A client that closes every connection after its response, so a
/// graceful shutdown has nothing idle to wait for.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
