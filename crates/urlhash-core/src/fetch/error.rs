//! Fetch error type.

use thiserror::Error;

/// Coarse failure class of a fetch, independent of the transport's error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    RequestBuild,
    Transport,
    BodyRead,
}

/// Error returned by a single fetch-and-hash.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be built (malformed URL, unsupported scheme, bad option).
    #[error("get request: {0}")]
    RequestBuild(#[source] curl::Error),
    /// The request failed before a response arrived (DNS, connect, TLS, timeout).
    #[error("http get: {0}")]
    Transport(#[source] curl::Error),
    /// The response started but the body could not be read to the end.
    #[error("io copy: {0}")]
    BodyRead(#[source] curl::Error),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::RequestBuild(_) => FetchErrorKind::RequestBuild,
            FetchError::Transport(_) => FetchErrorKind::Transport,
            FetchError::BodyRead(_) => FetchErrorKind::BodyRead,
        }
    }
}
