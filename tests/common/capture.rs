//! Access-log capture, shared by the unit tests and the end-to-end tests.
//!
//! The including module must have `ACCESS_TARGET` in scope.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use super::ACCESS_TARGET;

#[derive(Clone, Debug, Default)]
pub struct Record {
    pub message: String,
    pub path: Option<String>,
    pub elapsed: Option<String>,
}

/// Collects every access-log event seen on the current thread.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<Record>>>);

impl Capture {
    /// Installs a capturing subscriber as the thread's default.
    ///
    /// `#[tokio::test]` runs on a current-thread runtime, so spawned tasks
    /// (server connections included) are polled on this thread and are
    /// captured too.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        (capture, tracing::subscriber::set_default(subscriber))
    }

    pub fn records(&self) -> Vec<Record> {
        self.0.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != ACCESS_TARGET {
            return;
        }
        let mut record = Record::default();
        event.record(&mut record);
        self.0.lock().unwrap().push(record);
    }
}

// `%value` fields arrive through `record_debug` with their `Display` text;
// plain `&str` fields arrive through `record_str`. Both keep the raw text.
impl Visit for Record {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.set(field, format!("{value:?}"));
    }
}

impl Record {
    fn set(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            "path" => self.path = Some(value),
            "elapsed" => self.elapsed = Some(value),
            _ => {}
        }
    }
}
