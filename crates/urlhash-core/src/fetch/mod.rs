//! Fetch-and-hash: GET a URL and digest the full response body.
//!
//! The pool only depends on the [`Fetcher`] / [`FetchSession`] pair; the
//! libcurl-backed [`HttpClient`] is the production implementation.

mod client;
mod error;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CurlSession, HttpClient};
pub use error::{FetchError, FetchErrorKind};

/// Shared, read-only source of per-worker fetch sessions.
///
/// One `Fetcher` is borrowed by every worker at once; each worker opens its own
/// session and keeps it for the lifetime of the worker.
pub trait Fetcher: Sync {
    type Session: FetchSession;

    fn session(&self) -> Self::Session;
}

/// Per-worker fetch state (connection cache, scratch buffers).
pub trait FetchSession {
    /// Issue one GET for `url` and return the lowercase hex MD5 of the body.
    ///
    /// The HTTP status is not inspected: any response that arrives in full is
    /// hashed. No retries.
    fn fetch_and_hash(&mut self, url: &str) -> Result<String, FetchError>;
}
