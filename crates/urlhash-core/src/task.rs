//! Units of work flowing through the pipeline.

use crate::fetch::FetchError;
use crate::normalize::normalize_url;
use std::fmt;

/// One normalized URL waiting to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    url: String,
}

impl Task {
    /// Build a task from raw user input, adding a scheme when missing.
    pub fn new(raw: &str) -> Self {
        Self {
            url: normalize_url(raw),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

/// A fetched URL and the MD5 of its body.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UrlDigest {
    pub url: String,
    /// Lowercase hex, 32 chars.
    pub digest: String,
}

impl fmt::Display for UrlDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.url, self.digest)
    }
}

/// A URL whose fetch failed.
#[derive(Debug)]
pub struct UrlFailure {
    pub url: String,
    pub error: FetchError,
}

impl fmt::Display for UrlFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.url, self.error)
    }
}

/// What a worker reports for each task it takes.
#[derive(Debug)]
pub enum Outcome {
    Hashed(UrlDigest),
    Failed(UrlFailure),
}

impl Outcome {
    pub fn url(&self) -> &str {
        match self {
            Outcome::Hashed(d) => &d.url,
            Outcome::Failed(f) => &f.url,
        }
    }

    pub fn as_hashed(&self) -> Option<&UrlDigest> {
        match self {
            Outcome::Hashed(d) => Some(d),
            Outcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}
