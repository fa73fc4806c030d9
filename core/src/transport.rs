//! The external transport collaborator contract.
//!
//! # Design
//! This crate builds requests but never touches the network; the host
//! supplies a [`Transport`] that executes the actual exchange. The split
//! keeps the builder deterministic and testable — unit tests plug in a
//! canned transport, integration tests a real one.

use crate::error::Error;
use crate::http::{Request, Response};

/// Callback handed to [`Transport::perform`], invoked once with the outcome
/// of the exchange.
pub type TransportCallback = Box<dyn FnOnce(Result<Response, Error>) + Send>;

/// Executes one HTTP exchange.
///
/// # Contract
/// `perform` must invoke `done` exactly once per call — with `Ok(Response)`
/// when any response came back (non-2xx included), or `Err` on a transport
/// failure. The callback runs on whatever thread or task context the
/// implementation completes on; callers needing affinity with a particular
/// context must redispatch themselves.
///
/// Implementations are expected not to block the caller in `perform`; the
/// exchange happens in the background. No cancellation handle is exposed and
/// this layer configures no timeout — whatever the implementation defaults
/// to applies.
pub trait Transport: Send + Sync {
    fn perform(&self, request: Request, done: TransportCallback);
}
