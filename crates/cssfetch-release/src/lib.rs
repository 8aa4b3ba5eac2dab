//! cssfetch-release
//!
//! Blocking I/O helpers for grabbing the newest CounterStrikeSharp build.
//! - Fetches the latest-release JSON from GitHub, retrying on rate limits
//!   and transient failures with fixed delays.
//! - Picks the asset whose name contains a fixed substring.
//! - Streams it to disk in 8 KiB chunks with progress, removing partial files.

pub mod config;
pub mod errors;
pub mod net;
pub mod progress;
pub mod release;
pub mod select;
pub mod types;

pub use config::{FetchConfig, RetryPolicy};
pub use errors::{FetchError, Result};
pub use net::{download_asset, HttpResponse, HttpTransport, ReqwestTransport};
pub use progress::{ProgressSink, Silent, TerminalProgress};
pub use release::fetch_latest_release;
pub use select::find_asset;
pub use types::*;

use log::info;
use std::time::Duration;

/// Look up the release and its matching asset without downloading anything.
pub fn resolve_asset<T, S>(config: &FetchConfig, transport: &T, sleep: S) -> Result<(Release, Asset)>
where
    T: HttpTransport + ?Sized,
    S: FnMut(Duration),
{
    let release = fetch_latest_release(transport, &config.api_url, &config.retry, sleep)?;
    let asset = find_asset(&release, &config.asset_pattern)
        .cloned()
        .ok_or_else(|| FetchError::NoMatchingAsset {
            pattern: config.asset_pattern.clone(),
            tag: release.tag_name.clone(),
        })?;
    info!("selected {} from {}", asset.name, release.tag_name);
    Ok((release, asset))
}

/// Fetch metadata, select the asset and download it into `config.download_dir`.
pub fn fetch_latest_asset<T, P, S>(
    config: &FetchConfig,
    transport: &T,
    progress: &mut P,
    sleep: S,
) -> Result<Downloaded>
where
    T: HttpTransport + ?Sized,
    P: ProgressSink + ?Sized,
    S: FnMut(Duration),
{
    let (release, asset) = resolve_asset(config, transport, sleep)?;
    let path = download_asset(transport, &asset, &config.download_dir, progress)?;
    let bytes = std::fs::metadata(&path)?.len();

    Ok(Downloaded {
        tag: release.tag_name,
        asset_name: asset.name,
        url: asset.browser_download_url,
        path,
        bytes,
    })
}
