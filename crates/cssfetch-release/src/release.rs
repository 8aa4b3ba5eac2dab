use crate::config::RetryPolicy;
use crate::errors::{FetchError, Result};
use crate::net::http::{HttpResponse, HttpTransport, GITHUB_JSON};
use crate::types::Release;
use log::{debug, info, warn};
use reqwest::StatusCode;
use std::time::Duration;

/// Fetch the latest release JSON, retrying with fixed delays.
///
/// Rate-limited responses wait `policy.rate_limit_delay`; timeouts, network
/// errors and other unexpected statuses wait `policy.transient_delay`.
/// A body that is not release JSON fails immediately. `sleep` is called
/// between attempts only, never after the last one.
pub fn fetch_latest_release<T, S>(
    transport: &T,
    url: &str,
    policy: &RetryPolicy,
    mut sleep: S,
) -> Result<Release>
where
    T: HttpTransport + ?Sized,
    S: FnMut(Duration),
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        debug!("GET {url} (attempt {attempt}/{attempts})");
        let err = match fetch_once(transport, url, policy.attempt_timeout) {
            Ok(release) => {
                info!("latest release is {}", release.tag_name);
                return Ok(release);
            }
            Err(e) => e,
        };

        let delay = match &err {
            FetchError::RateLimited { .. } => policy.rate_limit_delay,
            e if e.is_transient() => policy.transient_delay,
            _ => return Err(err),
        };

        if attempt >= attempts {
            return Err(FetchError::RetriesExhausted {
                attempts,
                last: Box::new(err),
            });
        }

        warn!(
            "attempt {attempt}/{attempts} failed: {err}; retrying in {}s",
            delay.as_secs_f32()
        );
        sleep(delay);
        attempt += 1;
    }
}

fn fetch_once<T: HttpTransport + ?Sized>(
    transport: &T,
    url: &str,
    timeout: Duration,
) -> Result<Release> {
    let resp = transport.get(url, GITHUB_JSON, Some(timeout))?;
    let status = resp.status;

    if status.is_success() {
        let txt = resp.text()?;
        return serde_json::from_str(&txt).map_err(|source| FetchError::InvalidJson {
            url: url.to_string(),
            source,
        });
    }

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        let header_says_limited = rate_limit_exhausted(&resp);
        let body = resp.text().unwrap_or_default();
        if header_says_limited || mentions_rate_limit(&body) {
            return Err(FetchError::RateLimited {
                status,
                url: url.to_string(),
            });
        }
    }

    Err(FetchError::Status {
        status,
        url: url.to_string(),
    })
}

/// GitHub sends `x-ratelimit-remaining: 0` once the quota is spent.
fn rate_limit_exhausted(resp: &HttpResponse) -> bool {
    resp.header_str("x-ratelimit-remaining")
        .map(|v| v.trim() == "0")
        .unwrap_or(false)
}

// Wording fallback for proxies that strip the headers.
fn mentions_rate_limit(body: &str) -> bool {
    body.to_ascii_lowercase().contains("rate limit")
}
