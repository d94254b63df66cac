use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Worker count used when neither the config file nor the CLI sets one.
pub const DEFAULT_PARALLEL: usize = 10;

/// Transport options applied to every request (optional `[http]` section).
///
/// Timeouts are unset by default: a fetch waits as long as the transport lets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect-phase timeout in seconds (None = transport default).
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds (None = no limit).
    pub timeout_secs: Option<u64>,
    /// Follow `Location` redirects.
    pub follow_redirects: bool,
    /// Redirect hops allowed before the fetch fails.
    pub max_redirections: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: None,
            timeout_secs: None,
            follow_redirects: true,
            max_redirections: 10,
        }
    }
}

/// Configuration loaded from `~/.config/urlhash/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlhashConfig {
    /// Number of concurrent fetch workers. Must be at least 1.
    pub parallel: usize,
    pub http: HttpConfig,
}

impl Default for UrlhashConfig {
    fn default() -> Self {
        Self {
            parallel: DEFAULT_PARALLEL,
            http: HttpConfig::default(),
        }
    }
}

impl UrlhashConfig {
    pub fn validate(&self) -> Result<()> {
        if self.parallel == 0 {
            anyhow::bail!("parallel must be at least 1");
        }
        if self.http.timeout_secs == Some(0) || self.http.connect_timeout_secs == Some(0) {
            anyhow::bail!("timeouts must be at least 1 second; leave unset for no limit");
        }
        Ok(())
    }
}

/// Location of the user config file, if one exists.
pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urlhash")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load configuration from the user config file, or defaults when there is none.
/// Nothing is written to disk.
pub fn load() -> Result<UrlhashConfig> {
    match config_path()? {
        Some(path) => load_from_path(&path),
        None => Ok(UrlhashConfig::default()),
    }
}

/// Load and validate configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<UrlhashConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: UrlhashConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
