#![allow(dead_code)]

use cssfetch_release::{FetchError, HttpResponse, HttpTransport, ProgressSink, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{self, Read};
use std::time::Duration;

pub const API_URL: &str = "https://api.test/repos/roflmuffin/CounterStrikeSharp/releases/latest";

/// One scripted answer for a URL.
pub struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    content_length: Option<u64>,
    read_size: usize,
    fail_after: Option<usize>,
    timeout: bool,
}

impl Reply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            content_length: Some(body.len() as u64),
            body,
            read_size: usize::MAX,
            fail_after: None,
            timeout: false,
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self::ok(value.to_string())
    }

    pub fn status(code: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(code).unwrap(),
            ..Self::ok(body)
        }
    }

    pub fn timeout() -> Self {
        Self {
            timeout: true,
            ..Self::ok("")
        }
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(value).unwrap(),
        );
        self
    }

    pub fn declared_length(mut self, len: Option<u64>) -> Self {
        self.content_length = len;
        self
    }

    /// Hand out at most `n` bytes per read call.
    pub fn read_size(mut self, n: usize) -> Self {
        self.read_size = n;
        self
    }

    /// Error out once `n` bytes have been delivered.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }
}

/// In-memory transport: replies are consumed in order per URL.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<HashMap<String, VecDeque<Reply>>>,
    calls: RefCell<Vec<(String, String, Option<Duration>)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, url: &str, reply: Reply) -> Self {
        self.replies
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|(u, _, _)| u == url).count()
    }

    pub fn accept_for(&self, url: &str) -> Option<String> {
        self.calls
            .borrow()
            .iter()
            .find(|(u, _, _)| u == url)
            .map(|(_, a, _)| a.clone())
    }

    /// Per-request timeout of every call to `url`, in order.
    pub fn timeouts_for(&self, url: &str) -> Vec<Option<Duration>> {
        self.calls
            .borrow()
            .iter()
            .filter(|(u, _, _)| u == url)
            .map(|(_, _, t)| *t)
            .collect()
    }
}

impl HttpTransport for FakeTransport {
    fn get(&self, url: &str, accept: &str, timeout: Option<Duration>) -> Result<HttpResponse> {
        self.calls
            .borrow_mut()
            .push((url.to_string(), accept.to_string(), timeout));

        let reply = self
            .replies
            .borrow_mut()
            .get_mut(url)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| panic!("unexpected request to {url}"));

        if reply.timeout {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            });
        }

        Ok(HttpResponse {
            status: reply.status,
            headers: reply.headers,
            content_length: reply.content_length,
            body: Box::new(ScriptedBody {
                data: reply.body,
                pos: 0,
                read_size: reply.read_size,
                fail_after: reply.fail_after,
            }),
        })
    }
}

struct ScriptedBody {
    data: Vec<u8>,
    pos: usize,
    read_size: usize,
    fail_after: Option<usize>,
}

impl Read for ScriptedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = self.fail_after.unwrap_or(self.data.len()).min(self.data.len());
        if self.pos >= limit {
            if self.fail_after.is_some() {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ));
            }
            return Ok(0);
        }
        let n = buf.len().min(self.read_size).min(limit - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Records everything a download reports.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub total: Option<Option<u64>>,
    pub positions: Vec<u64>,
    pub finished: bool,
}

impl ProgressSink for RecordingProgress {
    fn begin(&mut self, total: Option<u64>) {
        self.total = Some(total);
    }

    fn advance(&mut self, written: u64) {
        self.positions.push(written);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

pub fn release_json(assets: &[(&str, &str)]) -> serde_json::Value {
    serde_json::json!({
        "tag_name": "v300",
        "name": "v300",
        "html_url": "https://github.com/roflmuffin/CounterStrikeSharp/releases/tag/v300",
        "assets": assets
            .iter()
            .map(|(name, url)| serde_json::json!({ "name": name, "browser_download_url": url }))
            .collect::<Vec<_>>(),
    })
}
