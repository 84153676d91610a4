//! Transport layer abstraction for the analysis client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             ApiPortClient               │
//! │  (analysis + report orchestration)      │
//! └──────────────────┬──────────────────────┘
//!                    │
//!          ┌─────────▼─────────┐
//!          │ ServiceConnection │  base address + identity headers
//!          └─────────┬─────────┘
//!                    │ Arc<dyn Transport>
//!          ┌────────┴────────┐
//!          ▼                 ▼
//! ┌─────────────────┐ ┌─────────────────┐
//! │  HttpTransport  │ │  test doubles   │
//! │   (reqwest)     │ │  (in-memory)    │
//! └─────────────────┘ └─────────────────┘
//! ```
//!
//! Requests and responses cross the [`Transport`] seam fully buffered as
//! `http::Request<Bytes>` / `http::Response<Bytes>`, so substitutes need no
//! network stack at all.

mod connection;
mod http_client;

pub use connection::{ClientIdentity, ServiceConnection};
pub use http_client::HttpTransport;

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::Result;

/// Future returned by [`Transport::send`].
pub type SendFuture<'a> =
    Pin<Box<dyn Future<Output = Result<http::Response<Bytes>>> + Send + 'a>>;

/// Minimal "send a request, get a response" capability.
///
/// Implementations must be safe to share between concurrent in-flight
/// requests. A non-success status is NOT an error at this level; only
/// failures to complete the exchange are.
pub trait Transport: Send + Sync {
    /// Send one request and buffer the full response.
    fn send(&self, request: http::Request<Bytes>) -> SendFuture<'_>;

    /// Get the transport name for logging.
    fn name(&self) -> &'static str;
}
