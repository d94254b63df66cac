//! libcurl-backed fetcher.
//!
//! `HttpClient` only carries options and is shared by all workers. Each worker
//! gets a `CurlSession` wrapping its own easy handle; the handle is reset (not
//! recreated) between requests so libcurl keeps the worker's live connections
//! for keep-alive reuse.

use crate::config::HttpConfig;
use crate::digest::ContentDigest;
use std::str;
use std::time::Duration;

use super::{FetchError, FetchSession, Fetcher};

/// Shared HTTP client options.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl Fetcher for HttpClient {
    type Session = CurlSession;

    fn session(&self) -> CurlSession {
        CurlSession {
            easy: curl::easy::Easy::new(),
            config: self.config.clone(),
        }
    }
}

/// One worker's easy handle.
pub struct CurlSession {
    easy: curl::easy::Easy,
    config: HttpConfig,
}

impl CurlSession {
    fn configure(&mut self, url: &str) -> Result<(), curl::Error> {
        let easy = &mut self.easy;
        easy.reset();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(self.config.follow_redirects)?;
        if self.config.follow_redirects {
            easy.max_redirections(self.config.max_redirections)?;
        }
        if let Some(secs) = self.config.connect_timeout_secs {
            easy.connect_timeout(Duration::from_secs(secs))?;
        }
        if let Some(secs) = self.config.timeout_secs {
            easy.timeout(Duration::from_secs(secs))?;
        }
        Ok(())
    }
}

impl FetchSession for CurlSession {
    fn fetch_and_hash(&mut self, url: &str) -> Result<String, FetchError> {
        self.configure(url).map_err(FetchError::RequestBuild)?;

        let mut digest = ContentDigest::new();
        let mut progress = TransferProgress::default();
        // The transfer, and with it the response, is dropped inside
        // `perform_transfer` whichever way it ends.
        let performed = perform_transfer(
            &mut self.easy,
            &mut digest,
            &mut progress.headers_done,
            &mut progress.received_body,
        );

        if let Err(e) = performed {
            return Err(classify_perform_error(e, progress));
        }

        if let Ok(code) = self.easy.response_code() {
            tracing::debug!(url, status = code, bytes = digest.bytes(), "fetched");
        }
        Ok(digest.finish_hex())
    }
}

fn perform_transfer(
    easy: &mut curl::easy::Easy,
    digest: &mut ContentDigest,
    headers_done: &mut bool,
    received_body: &mut bool,
) -> Result<(), curl::Error> {
    let mut transfer = easy.transfer();
    transfer.header_function(|line| {
        *headers_done = track_header_line(*headers_done, line);
        true
    })?;
    transfer.write_function(|data| {
        *received_body = true;
        digest.update(data);
        Ok(data.len())
    })?;
    transfer.perform()
}

/// How far a transfer got before it failed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TransferProgress {
    /// The header block of the last response received so far was complete.
    pub headers_done: bool,
    /// At least one body chunk was delivered.
    pub received_body: bool,
}

/// Header state after seeing `line`: a status line opens a new header block
/// (redirect hops), a blank line closes it.
fn track_header_line(headers_done: bool, line: &[u8]) -> bool {
    let Ok(s) = str::from_utf8(line) else {
        return headers_done;
    };
    if s.starts_with("HTTP/") {
        false
    } else if s.trim_end().is_empty() {
        true
    } else {
        headers_done
    }
}

/// Map a failed `perform` onto the fetch error taxonomy.
pub(crate) fn classify_perform_error(e: curl::Error, progress: TransferProgress) -> FetchError {
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return FetchError::RequestBuild(e);
    }
    if e.is_partial_file()
        || progress.received_body
        || (progress.headers_done && (e.is_recv_error() || e.is_operation_timedout()))
    {
        return FetchError::BodyRead(e);
    }
    FetchError::Transport(e)
}
