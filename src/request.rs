//! Incoming HTTP request type.

use bytes::Bytes;
use http::Uri;

/// An incoming HTTP request with its body already collected.
///
/// The body is read in full before the handler chain runs, so middleware and
/// handlers see the same immutable bytes.
pub struct Request {
    pub(crate) uri: Uri,
    pub(crate) body: Bytes,
}

impl Request {
    pub(crate) fn new(uri: Uri, body: Bytes) -> Self {
        Self { uri, body }
    }

    pub fn path(&self) -> &str { self.uri.path() }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Path plus query string, exactly as the client sent it.
    ///
    /// This is what the access log records: `/config?dry=1` stays
    /// `/config?dry=1`.
    pub fn request_uri(&self) -> &str {
        self.uri
            .path_and_query()
            .map_or_else(|| self.uri.path(), |pq| pq.as_str())
    }
}

/// Build a [`Request`] from an `http` request whose body is already in memory.
///
/// Handy for driving handlers and middleware without a socket:
///
/// ```rust
/// use switchback::Request;
///
/// let req: Request = http::Request::post("/config")
///     .body(bytes::Bytes::from_static(br#"{"option":"verbose"}"#))
///     .unwrap()
///     .into();
/// assert_eq!(req.path(), "/config");
/// ```
impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts.uri, body)
    }
}
