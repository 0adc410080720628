//! Runtime-swappable middleware.
//!
//! # Shape
//!
//! ```text
//!            ┌──────────── Registry (frozen) ────────────┐
//!            │  "quiet"   → Arc<Quiet>                   │
//!            │  "verbose" → Arc<Verbose>                 │
//!            └───────────────────────────────────────────┘
//!                                ▲ lookup
//!   update("verbose") ───────────┘        │ store
//!                                         ▼
//!                         ArcSwap<Active { name, middleware }>
//!                                         │ load (once per request)
//!   request ──▶ Dispatch ─────────────────┘──▶ active.call(req, next)
//! ```
//!
//! # Concurrency
//!
//! The active slot is an [`ArcSwap`]. A request loads it once, lock-free, and
//! runs whatever it got; `update` stores a whole new entry in one atomic
//! pointer swap. A reader therefore sees either the old entry or the new one,
//! never a mix. Requests that loaded the old entry finish under it.
//!
//! The registry itself is immutable after construction and is read without
//! synchronisation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info};

use super::{Middleware, QUIET, Quiet, VERBOSE, Verbose};
use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;

// ── Registry ──────────────────────────────────────────────────────────────────

/// Name → variant map. Built once, read-only afterwards.
#[derive(Clone, Default)]
pub struct Registry {
    variants: HashMap<String, Arc<dyn Middleware>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two variants the server ships with: `quiet` and `verbose`.
    pub fn builtin() -> Self {
        Self::new().with(QUIET, Quiet).with(VERBOSE, Verbose)
    }

    /// Register `middleware` under `name`. A later registration of the same
    /// name replaces the earlier one.
    pub fn with(mut self, name: impl Into<String>, middleware: impl Middleware) -> Self {
        self.variants.insert(name.into(), Arc::new(middleware));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Middleware>> {
        self.variants.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variants.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("variants", &self.names()).finish()
    }
}

// ── StatefulMiddleware ────────────────────────────────────────────────────────

/// The registry entry currently in force.
struct Active {
    name: Arc<str>,
    middleware: Arc<dyn Middleware>,
}

/// Owns the variant registry and the active variant; the only way to read or
/// change which variant wraps requests.
///
/// ```rust
/// use std::sync::Arc;
/// use switchback::middleware::{Registry, StatefulMiddleware};
///
/// let stateful = Arc::new(StatefulMiddleware::new("quiet", Registry::builtin()).unwrap());
/// stateful.update("verbose").unwrap();
/// assert_eq!(&*stateful.current(), "verbose");
/// assert!(stateful.update("bogus").is_err());
/// assert_eq!(&*stateful.current(), "verbose");
/// ```
pub struct StatefulMiddleware {
    registry: Registry,
    active: ArcSwap<Active>,
}

impl StatefulMiddleware {
    /// Start with `initial` active.
    ///
    /// Fails with [`Error::InvalidVariantName`] if `initial` is not registered.
    pub fn new(initial: &str, registry: Registry) -> Result<Self, Error> {
        let active = Self::entry(&registry, initial)?;
        Ok(Self { registry, active: ArcSwap::from_pointee(active) })
    }

    /// Make `name` the active variant for every request that reaches
    /// dispatch from now on.
    ///
    /// Unknown names fail with [`Error::InvalidVariantName`] and leave the
    /// active variant untouched.
    pub fn update(&self, name: &str) -> Result<(), Error> {
        let next = Self::entry(&self.registry, name)?;
        let prev = self.active.swap(Arc::new(next));
        info!(from = %prev.name, to = name, "middleware switched");
        Ok(())
    }

    /// Name of the variant currently in force.
    pub fn current(&self) -> Arc<str> {
        Arc::clone(&self.active.load().name)
    }

    /// Names `update` accepts, sorted. Fixed for the lifetime of `self`.
    pub fn names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Wrap `downstream` in whatever variant is active *when each request
    /// arrives*.
    ///
    /// The variant is looked up per request, not here, so an [`update`]
    /// affects handlers that were wrapped long before it.
    ///
    /// [`update`]: StatefulMiddleware::update
    pub fn dispatch(self: &Arc<Self>, downstream: BoxedHandler) -> BoxedHandler {
        Arc::new(Dispatch { state: Arc::clone(self), next: downstream })
    }

    fn entry(registry: &Registry, name: &str) -> Result<Active, Error> {
        let middleware = registry
            .get(name)
            .ok_or_else(|| Error::invalid_variant(name))?;
        Ok(Active { name: Arc::from(name), middleware: Arc::clone(middleware) })
    }
}

impl fmt::Debug for StatefulMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatefulMiddleware")
            .field("registry", &self.registry)
            .field("current", &self.current())
            .finish()
    }
}

/// Handler returned by [`StatefulMiddleware::dispatch`].
struct Dispatch {
    state: Arc<StatefulMiddleware>,
    next: BoxedHandler,
}

impl ErasedHandler for Dispatch {
    fn call(&self, req: Request) -> BoxFuture {
        let active = self.state.active.load();
        debug!(variant = %active.name, "dispatching");
        active.middleware.call(req, Arc::clone(&self.next))
    }
}
