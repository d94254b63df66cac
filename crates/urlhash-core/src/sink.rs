//! Result sinks: where outcomes go once the pool has produced them.

use crate::task::{Outcome, UrlDigest};
use anyhow::{Context, Result};
use std::io::{self, Write};

/// Consumer end of the outcome queue. Runs on the pipeline's consumer thread.
pub trait ResultSink: Send {
    fn accept(&mut self, outcome: Outcome) -> Result<()>;
}

/// Writes one `<url> <digest>` line per hashed URL and flushes after each,
/// so output streams as results arrive.
///
/// Failures never reach the main writer. They are logged, and written as
/// `<url> error: <message>` to the error writer when one is attached.
pub struct LineSink<W> {
    out: W,
    errors: Option<Box<dyn Write + Send>>,
}

impl LineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, errors: None }
    }

    /// Also report failed URLs to `errors` (typically stderr).
    pub fn with_errors(mut self, errors: impl Write + Send + 'static) -> Self {
        self.errors = Some(Box::new(errors));
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ResultSink for LineSink<W> {
    fn accept(&mut self, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Hashed(d) => {
                writeln!(self.out, "{}", d).context("write result line")?;
                self.out.flush().context("flush result line")?;
            }
            Outcome::Failed(f) => {
                tracing::warn!(url = %f.url, error = %f.error, "fetch failed");
                if let Some(errors) = self.errors.as_mut() {
                    writeln!(errors, "{}", f).context("write failure line")?;
                }
            }
        }
        Ok(())
    }
}

/// Keeps every outcome in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectSink {
    outcomes: Vec<Outcome>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<Outcome> {
        self.outcomes
    }

    /// Successful results only, sorted by URL then digest.
    pub fn sorted_digests(&self) -> Vec<UrlDigest> {
        let mut digests: Vec<UrlDigest> =
            self.outcomes.iter().filter_map(Outcome::as_hashed).cloned().collect();
        digests.sort();
        digests
    }
}

impl ResultSink for CollectSink {
    fn accept(&mut self, outcome: Outcome) -> Result<()> {
        self.outcomes.push(outcome);
        Ok(())
    }
}
