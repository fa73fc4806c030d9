//! Fluent asynchronous HTTP request builder with a JSON specialization.
//!
//! # Overview
//! Construct a request declaratively (headers, mime type, method, body),
//! then hand it to a [`Transport`] collaborator and receive the outcome
//! through a completion callback once the exchange finishes. The crate does
//! no network I/O of its own — sockets, TLS, redirects and the rest belong
//! to whichever `Transport` the host supplies.
//!
//! # Design
//! - `RequestBuilder` owns exactly one [`Request`]; mutators chain by value
//!   and the terminal send consumes the builder, so each builder performs at
//!   most one exchange.
//! - Every outcome flows through a single `Result` shape: a [`Response`] on
//!   any completed exchange (status uninterpreted), an [`Error`] for URL
//!   construction, transport and JSON-parse failures. No failure path is
//!   silent.
//! - Completions run exactly once, on whatever context the transport
//!   completes on; callers needing a particular thread redispatch
//!   themselves.
//! - No pooling, retries, timeouts, streaming or cancellation at this
//!   layer.

pub mod builder;
pub mod error;
pub mod http;
pub mod transport;

pub use builder::{
    json, json_get, json_get_path, json_path, request, request_path, JsonRequestBuilder,
    RequestBuilder,
};
pub use error::Error;
pub use http::{Method, Request, Response};
pub use transport::{Transport, TransportCallback};
