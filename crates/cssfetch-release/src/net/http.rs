use crate::errors::{FetchError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::StatusCode;
use std::io::Read;
use std::time::Duration;

pub const GITHUB_JSON: &str = "application/vnd.github+json";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A response whose body has not been read yet.
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub content_length: Option<u64>,
    pub body: Box<dyn Read + Send>,
}

impl HttpResponse {
    /// Drain the body into a string (lossy on invalid UTF-8).
    pub fn text(mut self) -> Result<String> {
        let mut buf = Vec::new();
        self.body.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Blocking GET. Callers own retries; implementations only translate errors.
///
/// `timeout` overrides the client-wide limit for this request only.
pub trait HttpTransport {
    fn get(&self, url: &str, accept: &str, timeout: Option<Duration>) -> Result<HttpResponse>;
}

/// Blocking HTTPS client with rustls.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, accept: &str, timeout: Option<Duration>) -> Result<HttpResponse> {
        let mut req = self.client.get(url).header(ACCEPT, accept);
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        let resp = req
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Net(e)
                }
            })?;

        Ok(HttpResponse {
            status: resp.status(),
            headers: resp.headers().clone(),
            content_length: resp.content_length(),
            body: Box::new(resp),
        })
    }
}
