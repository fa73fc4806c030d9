//! Error types for the request builder.
//!
//! # Design
//! One enum covers the three ways an exchange can go wrong: the target
//! string never became a URL, the transport failed, or the body was not the
//! JSON the caller asked for. Every variant reaches the caller — through an
//! absent builder for the synchronous constructors, through the completion
//! callback for everything else. Nothing is swallowed.

use std::fmt;

/// Errors delivered by constructors and completion callbacks.
#[derive(Debug)]
pub enum Error {
    /// A path string could not be parsed (possibly after percent-encoding)
    /// into a valid URL.
    InvalidUrl { input: String, reason: String },

    /// The transport collaborator reported a failure (DNS, connection
    /// refused, TLS, ...). Never retried by this layer.
    Transport(String),

    /// The response body was not valid JSON.
    JsonParse { url: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidUrl { input, reason } => {
                write!(f, "invalid URL {input:?}: {reason}")
            }
            Error::Transport(msg) => write!(f, "transport failed: {msg}"),
            Error::JsonParse { url, reason } => {
                write!(f, "response from {url} is not valid JSON: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}
