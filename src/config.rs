//! Startup configuration.
//!
//! Fixed at build time: the server always listens on port 8080 and starts in
//! `quiet` mode. Logging verbosity is the only thing tuned from outside, via
//! `RUST_LOG`.

use std::net::{Ipv4Addr, SocketAddr};

use crate::middleware::QUIET;

pub const DEFAULT_PORT: u16 = 8080;

/// Where to listen and which middleware variant to start with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub initial_variant: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            initial_variant: QUIET.to_owned(),
        }
    }
}
