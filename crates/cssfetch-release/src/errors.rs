use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Msg(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Net(#[from] reqwest::Error),

    #[error("invalid release JSON from {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("rate limited by {url} (HTTP {status})")]
    RateLimited { status: StatusCode, url: String },

    #[error("gave up after {attempts} attempt(s)")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },

    #[error("no asset containing {pattern:?} in release {tag}")]
    NoMatchingAsset { pattern: String, tag: String },

    #[error("refusing to write asset with unsafe name {0:?}")]
    InvalidAssetName(String),

    #[error("download truncated: got {written} of {expected} bytes")]
    Truncated { written: u64, expected: u64 },
}

impl FetchError {
    /// Errors worth another metadata attempt after the short fixed delay.
    /// Rate limiting is handled separately with its own delay.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Io(_)
                | FetchError::Net(_)
                | FetchError::Timeout { .. }
                | FetchError::Status { .. }
        )
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(e: anyhow::Error) -> Self {
        FetchError::Msg(format!("{e:#}"))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
