use anyhow::Result;
use clap::Parser;
use cssfetch_release::config::RELEASES_PAGE;
use cssfetch_release::{
    download_asset, resolve_asset, FetchConfig, FetchError, ReqwestTransport, TerminalProgress,
};
use log::{debug, LevelFilter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

/// Download the latest CounterStrikeSharp Linux build (with runtime).
#[derive(Debug, Parser)]
#[command(name = "cssfetch", version, about)]
struct Args {
    /// Directory to write the asset into [default: CounterStrikeSharp_linux_releases]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Metadata fetch attempts before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Seconds to wait after a rate-limited response
    #[arg(long, value_name = "SECS")]
    retry_delay: Option<u64>,

    /// Overall HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Resolve and print the asset URL without downloading
    #[arg(long)]
    dry_run: bool,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, cfg: &mut FetchConfig) {
        if let Some(dir) = &self.output_dir {
            cfg.download_dir = dir.clone();
        }
        if let Some(n) = self.max_attempts {
            cfg.retry.max_attempts = n;
        }
        if let Some(secs) = self.retry_delay {
            cfg.retry.rate_limit_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout {
            cfg.timeout = Duration::from_secs(secs);
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut cfg = FetchConfig::from_env()?;
    args.apply(&mut cfg);

    let transport = ReqwestTransport::new(&cfg.user_agent, cfg.timeout)?;

    println!("Fetching latest release information via GitHub API...");
    let (release, asset) = resolve_asset(&cfg, &transport, thread::sleep)?;

    println!("Found latest Linux release {}: {}", release.tag_name, asset.name);
    println!("{}", source_line(&asset.browser_download_url, args.dry_run));
    if args.dry_run {
        return Ok(());
    }

    let mut progress = TerminalProgress::new();
    let path = download_asset(&transport, &asset, &cfg.download_dir, &mut progress)?;
    println!("Successfully downloaded to: {}", path.display());
    Ok(())
}

fn source_line(url: &str, dry_run: bool) -> String {
    if dry_run {
        format!("Asset URL: {url}")
    } else {
        format!("Downloading from: {url}")
    }
}

fn report(e: &anyhow::Error) {
    match e.downcast_ref::<FetchError>() {
        Some(FetchError::RetriesExhausted { attempts, .. }) => {
            eprintln!("Could not fetch release information after {attempts} attempt(s): {e:#}");
        }
        Some(FetchError::NoMatchingAsset { pattern, tag }) => {
            eprintln!("Could not find an asset containing \"{pattern}\" in release {tag}.");
        }
        _ => eprintln!("Error: {e:#}"),
    }
    eprintln!("Try again later, or download it manually from {RELEASES_PAGE}");
}
