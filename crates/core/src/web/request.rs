use std::{any::Any, collections::BTreeMap, net::SocketAddr, time::Duration};

use http::{HeaderMap, Request, header};
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Headers whose values never reach the log.
pub const REDACTED_HEADERS: &[&str] = &["authorization", "proxy-authorization"];

/// Replacement value for redacted headers.
pub const REDACTED: &str = "REDACTED";

/// Summary of an HTTP request and, once handled, its response.
///
/// Built from the request with [`HttpRequest::from_request`]; status, size and
/// elapsed time are filled in by [`HttpRequest::complete`] before logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: String,
    pub uri: String,
    pub proto: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub host: String,
    pub remote_addr: String,
    pub content_length: Option<u64>,
    pub status: u16,
    pub size: u64,
    pub elapsed_ms: f64,
}

impl HttpRequest {
    pub const SCHEMA: &'static str = "httprequest";

    pub fn from_request<B>(req: &Request<B>, remote_addr: Option<SocketAddr>) -> Self {
        let headers = req.headers();
        let host = req
            .uri()
            .authority()
            .map(|a| a.to_string())
            .or_else(|| header_str(headers, header::HOST))
            .unwrap_or_default();
        let content_length =
            header_str(headers, header::CONTENT_LENGTH).and_then(|v| v.trim().parse().ok());

        Self {
            method: req.method().to_string(),
            uri: req.uri().to_string(),
            proto: format!("{:?}", req.version()),
            headers: redact_headers(headers),
            host,
            remote_addr: remote_addr.map(|a| a.to_string()).unwrap_or_default(),
            content_length,
            status: 0,
            size: 0,
            elapsed_ms: 0.0,
        }
    }

    pub fn complete(&mut self, status: http::StatusCode, size: u64, elapsed: Duration) {
        self.status = status.as_u16();
        self.size = size;
        self.elapsed_ms = elapsed.as_nanos() as f64 / 1_000_000.0;
    }
}

impl Event for HttpRequest {
    fn schema(&self) -> &str {
        Self::SCHEMA
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

pub fn is_redacted(name: &str) -> bool {
    REDACTED_HEADERS.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn redact_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in headers.keys() {
        let values = if is_redacted(name.as_str()) {
            vec![REDACTED.to_owned()]
        } else {
            headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect()
        };
        out.insert(name.as_str().to_owned(), values);
    }
    out
}
