//! CLI for urlhash.

mod commands;

use anyhow::Result;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use commands::run_hash;

/// Fetch URLs in parallel and print the MD5 of each response body.
#[derive(Debug, Parser)]
#[command(name = "urlhash")]
#[command(override_usage = "urlhash [OPTIONS] url1 url2 ...")]
#[command(about = "Fetch URLs in parallel and print the MD5 of each response body", long_about = None)]
pub struct Cli {
    /// Number of concurrent fetch workers (default 10, or `parallel` from the config file).
    #[arg(long, value_name = "N", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub parallel: Option<usize>,

    /// Read configuration from this file instead of ~/.config/urlhash/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also print failed URLs with their error to stderr.
    #[arg(long)]
    pub show_errors: bool,

    /// URLs to fetch. Inputs not starting with "http" get an http:// prefix.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,
}

impl Cli {
    pub fn run_from_args() -> Result<ExitCode> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<ExitCode> {
        if self.urls.is_empty() {
            println!("no urls provided");
            return Ok(ExitCode::FAILURE);
        }
        run_hash(
            &self.urls,
            self.config.as_deref(),
            self.parallel,
            self.show_errors,
        )?;
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests;
