//! Default command: hash every URL given on the command line.

use anyhow::Result;
use std::io;
use std::path::Path;
use urlhash_core::config::{self, UrlhashConfig};
use urlhash_core::pipeline::Pipeline;
use urlhash_core::sink::LineSink;

/// Config file (explicit path or the user's), with CLI overrides applied.
pub fn resolve_config(path: Option<&Path>, parallel: Option<usize>) -> Result<UrlhashConfig> {
    let mut cfg = match path {
        Some(p) => config::load_from_path(p)?,
        None => config::load()?,
    };
    if let Some(n) = parallel {
        cfg.parallel = n;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Run the pipeline and stream `<url> <digest>` lines to stdout.
/// Fetch failures are logged (and echoed to stderr with `show_errors`) but do
/// not fail the command.
pub fn run_hash(
    urls: &[String],
    config_path: Option<&Path>,
    parallel: Option<usize>,
    show_errors: bool,
) -> Result<()> {
    let cfg = resolve_config(config_path, parallel)?;
    tracing::debug!("resolved config: {:?}", cfg);

    let pipeline = Pipeline::from_config(&cfg)?;
    let mut sink = LineSink::stdout();
    if show_errors {
        sink = sink.with_errors(io::stderr());
    }

    let summary = pipeline.run(urls, &mut sink)?;
    if summary.failed() > 0 {
        tracing::info!(
            "{} of {} url(s) failed",
            summary.failed(),
            summary.submitted
        );
    }
    Ok(())
}
