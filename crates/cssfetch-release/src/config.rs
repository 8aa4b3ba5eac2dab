use crate::errors::{FetchError, Result};
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// GitHub API endpoint for the latest CounterStrikeSharp release.
pub const DEFAULT_API_URL: &str =
    "https://api.github.com/repos/roflmuffin/CounterStrikeSharp/releases/latest";

/// Human-facing release page, printed when something goes wrong.
pub const RELEASES_PAGE: &str = "https://github.com/roflmuffin/CounterStrikeSharp/releases";

/// Substring identifying the Linux build that bundles the .NET runtime.
pub const ASSET_PATTERN: &str = "counterstrikesharp-with-runtime-linux-";

pub const DEFAULT_DOWNLOAD_DIR: &str = "CounterStrikeSharp_linux_releases";

pub static USER_AGENT: Lazy<String> =
    Lazy::new(|| format!("cssfetch/{}", env!("CARGO_PKG_VERSION")));

/// Fixed-delay retry settings for the metadata fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Sleep after a rate-limited response.
    pub rate_limit_delay: Duration,
    /// Sleep after a timeout, network error or unexpected status.
    pub transient_delay: Duration,
    /// Per-request limit for each metadata attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_delay: Duration::from_secs(60),
            transient_delay: Duration::from_secs(5),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Attempts actually made; zero still means one try.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_url: String,
    pub asset_pattern: String,
    pub download_dir: PathBuf,
    pub retry: RetryPolicy,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            asset_pattern: ASSET_PATTERN.to_string(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(600),
            user_agent: (*USER_AGENT).clone(),
        }
    }
}

impl FetchConfig {
    /// Defaults, overridden by `CSSFETCH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(url) = lookup("CSSFETCH_API_URL") {
            cfg.api_url = url;
        }
        if let Some(dir) = lookup("CSSFETCH_DOWNLOAD_DIR") {
            cfg.download_dir = PathBuf::from(dir);
        }
        if let Some(n) = lookup("CSSFETCH_MAX_ATTEMPTS") {
            cfg.retry.max_attempts = parse_var("CSSFETCH_MAX_ATTEMPTS", &n)?;
        }
        if let Some(secs) = lookup("CSSFETCH_RETRY_DELAY_SECS") {
            cfg.retry.rate_limit_delay =
                Duration::from_secs(parse_var("CSSFETCH_RETRY_DELAY_SECS", &secs)?);
        }
        Ok(cfg)
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| FetchError::Msg(format!("invalid value for {key}: {raw:?}")))
}
