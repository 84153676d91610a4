//! # ApiPort Client - Portability Analysis Service Client
//!
//! Client library for a remote portability-analysis service. A caller builds
//! an [`AnalyzeRequest`] describing an application (its assemblies, the APIs
//! they reference and the target platforms of interest), submits it, and
//! retrieves the finished report in a chosen presentation format.
//!
//! ## Features
//!
//! - **Compressed submission**: gzip (default), deflate, brotli or identity
//! - **Server-directed polling**: `202 Accepted` + `Retry-After` drive the wait
//! - **Endpoint lifecycle**: deprecation signals reach an injected reporter
//! - **Cancellation**: every operation has a `*_with_cancellation` variant
//! - **Pluggable transport**: [`Transport`] trait, reqwest-backed by default
//!
//! ## Protocol Overview
//!
//! ```text
//! Caller              ApiPortClient                 Service
//!    |                      |                          |
//!    |-- submit_analysis -->|--- POST api/analyze ---->|
//!    |                      |<-- 202 Retry-After: 2 ---|
//!    |                      |       (sleep 2s)         |
//!    |                      |--- POST api/analyze ---->|
//!    |<-- AnalyzeResponse --|<-- 200 {ResultUrl..} ----|
//!    |                      |                          |
//!    |-- fetch_report ----->|--- GET ResultUrl ------->|
//!    |<------ Report -------|<-- 200 <bytes> ----------|
//! ```
//!
//! Every response may carry `Endpoint-Status: Deprecated`, which is forwarded
//! to the [`ProgressReporter`] once per response and never fails the call.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use apiport::{AnalyzeRequest, ApiPortClient, ClientIdentity, Config, TracingReporter};
//!
//! let config = Config::from_env();
//! let client = ApiPortClient::from_config(
//!     &config.client,
//!     ClientIdentity::this_crate(),
//!     Arc::new(TracingReporter),
//! )?;
//!
//! let targets = client.get_targets().await?;
//! let request = AnalyzeRequest::builder("MyApp").targets(targets).build();
//!
//! let response = client.submit_analysis(&request).await?;
//! let format = client.get_default_result_format().await?;
//! let report = client.fetch_report(response, &format).await?;
//! println!("{} bytes of {}", report.data.len(), report.mime_type);
//! ```
//!
//! ## Modules
//!
//! - [`client`]: Submission, polling and report retrieval
//! - [`codec`]: JSON serialization and transport compression
//! - [`protocol`]: Wire types, endpoints and header names
//! - [`transport`]: Transport trait, HTTP adapter and bound connection
//! - [`lifecycle`]: Endpoint deprecation monitor
//! - [`progress`]: User-facing notification sink
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod progress;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use client::{ApiPortClient, DEFAULT_RETRY_DELAY};
pub use codec::{Compression, PayloadCodec};
pub use config::{ClientConfig, Config};
pub use error::{ApiPortError, Result};
pub use lifecycle::EndpointMonitor;
pub use progress::{CollectingReporter, ProgressReporter, TracingReporter};
pub use protocol::{
    AnalyzeRequest, AnalyzeRequestBuilder, AnalyzeResponse, AssemblyInfo, EndpointStatus, Report,
    RequestFlags, ResultFormat,
};
pub use tokio_util::sync::CancellationToken;
pub use transport::{ClientIdentity, HttpTransport, ServiceConnection, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
