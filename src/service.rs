//! The two endpoints and the wiring that puts the stateful middleware in
//! front of them.
//!
//! | Path | Behavior |
//! |---|---|
//! | `/` | `200 {"ok":true}` |
//! | `/config` | switch the active middleware: body `{"option":"<name>"}` |

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use tracing::warn;

use crate::error::Error;
use crate::middleware::StatefulMiddleware;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;

/// Why a `/config` request was rejected. Every variant is a `400`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    /// The body is not a JSON object of strings.
    #[error("{0}")]
    BodyParse(#[from] serde_json::Error),

    #[error("missing \"option\" field")]
    MissingOptionField,

    #[error(transparent)]
    Update(#[from] Error),
}

impl IntoResponse for ConfigureError {
    fn into_response(self) -> Response {
        Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("x-content-type-options", "nosniff")
            .text(self.to_string())
    }
}

#[derive(Serialize)]
struct Ack {
    ok: bool,
}

#[derive(Serialize)]
struct Changed {
    changed: bool,
}

/// `GET /` (any method): fixed acknowledgement, whatever the active variant.
pub async fn status(_req: Request) -> Response {
    Response::json_value(&Ack { ok: true })
}

/// Handlers that need the stateful middleware.
#[derive(Debug)]
pub struct Service {
    middleware: Arc<StatefulMiddleware>,
}

impl Service {
    pub fn new(middleware: Arc<StatefulMiddleware>) -> Self {
        Self { middleware }
    }

    /// `/config`: parse `{"option": "<name>"}` and switch to that variant.
    pub fn configure(&self, req: &Request) -> Result<Response, ConfigureError> {
        // A flat string map: any non-string value is a parse error too.
        let mut body: HashMap<String, String> = serde_json::from_slice(req.body())?;
        let option = body.remove("option").ok_or(ConfigureError::MissingOptionField)?;
        self.middleware.update(&option)?;
        Ok(Response::json_value(&Changed { changed: true }))
    }

    /// Routes for `/` and `/config`, without any layer.
    pub fn routes(self) -> Router {
        let svc = Arc::new(self);
        Router::new().route("/", status).route("/config", move |req: Request| {
            let svc = Arc::clone(&svc);
            async move {
                svc.configure(&req).inspect_err(|e| {
                    warn!(error = %e, "rejected middleware change");
                })
            }
        })
    }
}

/// The full application: both routes behind `middleware`'s dispatcher.
pub fn app(middleware: Arc<StatefulMiddleware>) -> Router {
    let dispatcher = Arc::clone(&middleware);
    Service::new(middleware)
        .routes()
        .layer(move |next| dispatcher.dispatch(next))
}
