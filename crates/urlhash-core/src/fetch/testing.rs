//! In-memory fetcher for pool and pipeline tests.

use super::{FetchError, FetchSession, Fetcher};
use crate::digest::md5_hex;

/// Hashes the URL text itself instead of going to the network. URLs that
/// contain `fail` produce a transport error; URLs that contain `panic` panic
/// the calling worker.
#[derive(Debug, Default)]
pub(crate) struct EchoFetcher;

pub(crate) struct EchoSession;

impl Fetcher for EchoFetcher {
    type Session = EchoSession;

    fn session(&self) -> EchoSession {
        EchoSession
    }
}

impl FetchSession for EchoSession {
    fn fetch_and_hash(&mut self, url: &str) -> Result<String, FetchError> {
        if url.contains("panic") {
            panic!("session panicked on {}", url);
        }
        if url.contains("fail") {
            return Err(FetchError::Transport(curl::Error::new(7)));
        }
        Ok(md5_hex(url.as_bytes()))
    }
}
