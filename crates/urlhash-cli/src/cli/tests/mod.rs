//! CLI parse and config resolution tests.

use super::Cli;
use super::commands::hash::resolve_config;
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_urls_with_defaults() {
    let cli = parse(&["urlhash", "google.com", "https://github.com"]);
    assert_eq!(cli.urls, ["google.com", "https://github.com"]);
    assert!(cli.parallel.is_none());
    assert!(cli.config.is_none());
    assert!(!cli.show_errors);
}

#[test]
fn cli_parse_parallel() {
    let cli = parse(&["urlhash", "--parallel", "3", "a.test", "b.test"]);
    assert_eq!(cli.parallel, Some(3));
    assert_eq!(cli.urls.len(), 2);

    let cli = parse(&["urlhash", "a.test", "--parallel=1"]);
    assert_eq!(cli.parallel, Some(1));
}

#[test]
fn cli_parse_rejects_zero_parallel() {
    assert!(Cli::try_parse_from(["urlhash", "--parallel", "0", "a.test"]).is_err());
    assert!(Cli::try_parse_from(["urlhash", "--parallel", "-2", "a.test"]).is_err());
}

#[test]
fn cli_parse_no_urls_is_accepted() {
    // Reported at run time with "no urls provided" rather than as a usage error.
    let cli = parse(&["urlhash", "--parallel", "4"]);
    assert!(cli.urls.is_empty());
}

#[test]
fn run_without_urls_exits_with_failure() {
    assert_eq!(parse(&["urlhash"]).run().unwrap(), ExitCode::FAILURE);
    assert_eq!(
        parse(&["urlhash", "--parallel", "2", "--show-errors"]).run().unwrap(),
        ExitCode::FAILURE
    );
}

#[test]
fn cli_parse_show_errors_and_config() {
    let cli = parse(&[
        "urlhash",
        "--show-errors",
        "--config",
        "/tmp/urlhash.toml",
        "a.test",
    ]);
    assert!(cli.show_errors);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/urlhash.toml"))
    );
}

#[test]
fn cli_parallel_overrides_config_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "parallel = 4").unwrap();
    f.flush().unwrap();

    let cfg = resolve_config(Some(f.path()), None).unwrap();
    assert_eq!(cfg.parallel, 4);
    let cfg = resolve_config(Some(f.path()), Some(7)).unwrap();
    assert_eq!(cfg.parallel, 7);
}
