//! Unified error type.

use std::net::SocketAddr;

/// The error type returned by switchback's fallible operations.
///
/// Per-request failures (bad bodies, unknown variant names) are turned into
/// HTTP [`Response`](crate::Response) values by the handler that hit them.
/// Only startup and listener failures leave [`Server::serve`](crate::Server::serve).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested middleware variant is not in the registry.
    #[error("invalid middleware name")]
    InvalidVariantName { name: String },

    /// The listener could not be established. Fatal at startup.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_variant(name: impl Into<String>) -> Self {
        Self::InvalidVariantName { name: name.into() }
    }
}
