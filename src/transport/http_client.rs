//! HTTP transport backed by a pooled `reqwest::Client`.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;

use super::{SendFuture, Transport};
use crate::error::{ApiPortError, Result};

/// reqwest-based transport.
///
/// Owns one connection pool shared by every request issued through it.
/// The pool is released when the last owner drops the transport.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiPortError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Configured request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: http::Request<Bytes>) -> SendFuture<'_> {
        Box::pin(async move {
            let request = reqwest::Request::try_from(request)?;
            let response = self.client.execute(request).await?;

            let status = response.status();
            let version = response.version();
            let headers = response.headers().clone();
            let body = response.bytes().await?;

            let mut out = http::Response::new(body);
            *out.status_mut() = status;
            *out.version_mut() = version;
            *out.headers_mut() = headers;
            Ok(out)
        })
    }

    fn name(&self) -> &'static str {
        "HTTP/reqwest"
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        tracing::debug!("Releasing HTTP connection pool");
    }
}
