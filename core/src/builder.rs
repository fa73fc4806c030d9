//! Fluent request builders and the free constructor functions.
//!
//! # Design
//! `RequestBuilder` accumulates one request through chained mutators, then a
//! terminal call (`get`, `post*`, `send`) consumes it and dispatches through
//! the [`Transport`] collaborator. Consuming `self` makes the builder
//! single-use by construction — mutation after send does not typecheck.
//! `JsonRequestBuilder` wraps the base builder, pre-sets the JSON mime type
//! and parses the body before completing, so chained calls keep the JSON
//! capabilities without any downcasting.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use url::Url;

use crate::error::Error;
use crate::http::{Method, Request, Response};
use crate::transport::Transport;

/// Observer registered via [`RequestBuilder::response`]; fires at most once
/// with the raw response, before any parsing and before the completion.
pub type ResponseObserver = Box<dyn FnOnce(&Response) + Send>;

/// Fluent, single-use builder for one HTTP exchange.
///
/// Created by [`request`] or [`request_path`]. Mutators take and return
/// `self` for chaining; the terminal send-family calls consume the builder,
/// dispatch through the transport, and invoke the completion exactly once on
/// whatever context the transport completes on.
pub struct RequestBuilder {
    transport: Arc<dyn Transport>,
    request: Request,
    observer: Option<ResponseObserver>,
}

impl RequestBuilder {
    pub fn new(transport: Arc<dyn Transport>, url: Url) -> Self {
        Self {
            transport,
            request: Request::new(url),
            observer: None,
        }
    }

    /// Set a header, overwriting any previous value for the same name
    /// (case-insensitive, last write wins). Values are not validated;
    /// whatever is passed here reaches the transport as-is.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request.set_header(name, value);
        self
    }

    /// Set both `Accept` and `Content-Type` to `mime`.
    #[must_use]
    pub fn mime_type(mut self, mime: &str) -> Self {
        self.request.set_header("Accept", mime);
        self.request.set_header("Content-Type", mime);
        self
    }

    /// Register an observer for the raw response. It fires at most once,
    /// when the exchange yields a response (not on transport failure),
    /// before any JSON parsing and before the completion callback.
    #[must_use]
    pub fn response(mut self, observer: impl FnOnce(&Response) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Configure the method and dispatch the exchange.
    ///
    /// `body` is attached only when `method` is POST; other methods send no
    /// body. The call does not block — the transport completes in the
    /// background and `completion` runs exactly once on an unspecified
    /// context, with either the response (any status code) or the transport
    /// error.
    pub fn send(
        mut self,
        method: Method,
        body: Option<Vec<u8>>,
        completion: impl FnOnce(Result<Response, Error>) + Send + 'static,
    ) {
        self.request.method = method;
        if self.request.method == Method::Post {
            self.request.body = body;
        }

        let observer = self.observer;
        self.transport.perform(
            self.request,
            Box::new(move |result| {
                if let (Some(observer), Ok(response)) = (observer, &result) {
                    observer(response);
                }
                completion(result);
            }),
        );
    }

    /// Issue a GET.
    pub fn get(self, completion: impl FnOnce(Result<Response, Error>) + Send + 'static) {
        self.send(Method::Get, None, completion);
    }

    /// Issue a POST with no body.
    pub fn post(self, completion: impl FnOnce(Result<Response, Error>) + Send + 'static) {
        self.send(Method::Post, None, completion);
    }

    /// Issue a POST with `text` encoded as UTF-8 bytes.
    pub fn post_text(
        self,
        text: &str,
        completion: impl FnOnce(Result<Response, Error>) + Send + 'static,
    ) {
        self.send(Method::Post, Some(text.as_bytes().to_vec()), completion);
    }

    /// Issue a POST with a raw byte body.
    pub fn post_bytes(
        self,
        bytes: Vec<u8>,
        completion: impl FnOnce(Result<Response, Error>) + Send + 'static,
    ) {
        self.send(Method::Post, Some(bytes), completion);
    }
}

/// [`RequestBuilder`] specialized for JSON exchanges.
///
/// Pre-sets `Accept` and `Content-Type` to `application/json`; its [`get`]
/// parses the body and completes with the parsed value. Mutators delegate to
/// the base builder and return `Self`, so a chain started on a JSON builder
/// never loses the JSON operations.
///
/// [`get`]: JsonRequestBuilder::get
pub struct JsonRequestBuilder {
    inner: RequestBuilder,
}

impl JsonRequestBuilder {
    pub fn new(transport: Arc<dyn Transport>, url: Url) -> Self {
        Self {
            inner: RequestBuilder::new(transport, url).mime_type("application/json"),
        }
    }

    /// Same contract as [`RequestBuilder::header`].
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.inner = self.inner.header(name, value);
        self
    }

    /// Same contract as [`RequestBuilder::response`]: the observer sees the
    /// raw response before it is parsed as JSON.
    #[must_use]
    pub fn response(mut self, observer: impl FnOnce(&Response) + Send + 'static) -> Self {
        self.inner = self.inner.response(observer);
        self
    }

    /// Issue a GET and parse the body as JSON.
    ///
    /// Transport failures are forwarded without touching the body. A body
    /// that is not valid JSON completes with [`Error::JsonParse`] — the
    /// completion always runs, exactly once.
    pub fn get(self, completion: impl FnOnce(Result<Value, Error>) + Send + 'static) {
        let url = self.inner.request.url.clone();
        self.inner.send(Method::Get, None, move |result| match result {
            Err(err) => completion(Err(err)),
            Ok(response) => match serde_json::from_slice::<Value>(&response.body) {
                Ok(value) => completion(Ok(value)),
                Err(err) => {
                    log::warn!("response from {url} is not valid JSON: {err}");
                    completion(Err(Error::JsonParse {
                        url: url.to_string(),
                        reason: err.to_string(),
                    }));
                }
            },
        });
    }
}

/// The characters `URLQueryAllowedCharacterSet` leaves unescaped:
/// alphanumerics plus `! $ & ' ( ) * + , - . / : ; = ? @ _ ~`.
const URL_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'?')
    .remove(b'@')
    .remove(b'_')
    .remove(b'~');

/// Build a plain builder for an already-parsed URL.
pub fn request(transport: Arc<dyn Transport>, url: Url) -> RequestBuilder {
    RequestBuilder::new(transport, url)
}

/// Build a plain builder from a path string. No percent-encoding is applied;
/// returns `None` if the string does not parse as a URL.
pub fn request_path(transport: Arc<dyn Transport>, path: &str) -> Option<RequestBuilder> {
    let url = Url::parse(path).ok()?;
    Some(RequestBuilder::new(transport, url))
}

/// Build a JSON builder for an already-parsed URL, mime type pre-set to
/// `application/json`.
pub fn json(transport: Arc<dyn Transport>, url: Url) -> JsonRequestBuilder {
    JsonRequestBuilder::new(transport, url)
}

/// Build a JSON builder from a path string. The string is percent-encoded
/// with the query-allowed set before parsing; returns `None` if the encoded
/// string does not parse as a URL.
pub fn json_path(transport: Arc<dyn Transport>, path: &str) -> Option<JsonRequestBuilder> {
    let escaped = utf8_percent_encode(path, URL_QUERY).to_string();
    let url = Url::parse(&escaped).ok()?;
    Some(JsonRequestBuilder::new(transport, url))
}

/// One-shot helper: build a JSON builder for `url` and immediately GET.
pub fn json_get(
    transport: Arc<dyn Transport>,
    url: Url,
    completion: impl FnOnce(Result<Value, Error>) + Send + 'static,
) {
    json(transport, url).get(completion);
}

/// One-shot helper: percent-encode and parse `path`, then GET as JSON.
///
/// If the string does not become a valid URL the completion still runs, with
/// [`Error::InvalidUrl`] — construction failure is never silent here.
pub fn json_get_path(
    transport: Arc<dyn Transport>,
    path: &str,
    completion: impl FnOnce(Result<Value, Error>) + Send + 'static,
) {
    let escaped = utf8_percent_encode(path, URL_QUERY).to_string();
    match Url::parse(&escaped) {
        Ok(url) => json_get(transport, url, completion),
        Err(err) => completion(Err(Error::InvalidUrl {
            input: path.to_string(),
            reason: err.to_string(),
        })),
    }
}
