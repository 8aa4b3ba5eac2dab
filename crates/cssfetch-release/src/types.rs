use serde::{Deserialize, Serialize};

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub name: String, // e.g. "counterstrikesharp-with-runtime-linux-1.0.300.zip"
    pub browser_download_url: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// The parts of the GitHub "latest release" payload we read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// Result of a completed fetch + download (for printing).
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub tag: String,
    pub asset_name: String,
    pub url: String,
    pub path: std::path::PathBuf,
    pub bytes: u64,
}
