//! Plain-data HTTP types shared between the builder and the transport.
//!
//! # Design
//! A `Request` describes one HTTP exchange as plain data; the builder
//! accumulates it and hands it to the [`Transport`](crate::transport::Transport)
//! collaborator, which executes the actual I/O. A `Response` is whatever the
//! transport got back, status code uninterpreted — this layer attaches no
//! meaning to non-2xx.
//!
//! All fields use owned types (`String`, `Vec`) so values can move freely
//! into the transport's completion context.

use url::Url;

/// HTTP method for a request. The builder only issues GET and POST; further
/// verbs extend this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built up by [`RequestBuilder`](crate::RequestBuilder) and consumed by the
/// transport. The URL is fixed at construction; method and body are set by
/// the terminal send call.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// A GET request for `url` with no headers and no body.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            method: Method::Get,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set `name` to `value`, replacing any existing entry whose name matches
    /// case-insensitively. Last write wins; no legality validation is done —
    /// malformed names or values flow through to the transport.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(existing) = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            existing.1 = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    /// Look up a header value case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Produced by the transport after executing a `Request`. Carries the status
/// line and response headers alongside the raw body bytes; callers interpret
/// the status themselves.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}
