//! Analysis service client.
//!
//! [`ApiPortClient`] ties the pieces together:
//!
//! - [`ServiceConnection`]: base address, identity headers, transport
//! - [`PayloadCodec`]: JSON + compression for request bodies
//! - [`EndpointMonitor`]: deprecation signal on every response
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use apiport::{ApiPortClient, AnalyzeRequest, ClientIdentity, ResultFormat, TracingReporter};
//! use apiport::transport::HttpTransport;
//!
//! let transport = Arc::new(HttpTransport::new(Duration::from_secs(300))?);
//! let client = ApiPortClient::new(
//!     "https://portability.example.com",
//!     transport,
//!     ClientIdentity::new("my-tool", "1.2.0"),
//!     Arc::new(TracingReporter),
//! )?;
//!
//! let request = AnalyzeRequest::builder("MyApp").target(".NET Core, Version=2.0").build();
//! let response = client.submit_analysis(&request).await?;   // polls while 202
//! let report = client.fetch_report(response, &ResultFormat::from_mime("text/html")).await?;
//! ```
//!
//! # Cancellation
//!
//! Every operation has a `*_with_cancellation` variant taking a
//! [`CancellationToken`]. Network calls and poll waits are raced against
//! it; a cancelled operation returns [`ApiPortError::Cancelled`].

mod analyze;
mod report;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_ENCODING;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::codec::{Compression, PayloadCodec};
use crate::config::ClientConfig;
use crate::error::{ApiPortError, Result};
use crate::lifecycle::EndpointMonitor;
use crate::progress::messages::DEFAULT_LOCALE;
use crate::progress::ProgressReporter;
use crate::transport::{ClientIdentity, HttpTransport, ServiceConnection, Transport};

/// Poll delay used when a `202` carries no usable `Retry-After`
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Client for the analysis service.
///
/// Cheap to share by reference across tasks; the transport (and its
/// connection pool) is shared by every in-flight operation.
#[derive(Debug)]
pub struct ApiPortClient {
    connection: ServiceConnection,
    codec: PayloadCodec,
    monitor: EndpointMonitor,
    default_retry: Duration,
}

impl ApiPortClient {
    /// Create a client over an arbitrary transport.
    ///
    /// Fails with [`ApiPortError::Config`] if `base_address` is empty,
    /// whitespace, or not an absolute http(s) URL. No request is made.
    pub fn new(
        base_address: &str,
        transport: Arc<dyn Transport>,
        identity: ClientIdentity,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<Self> {
        let connection = ServiceConnection::new(base_address, transport, identity)?;

        tracing::debug!(
            base = %connection.base(),
            transport = connection.transport_name(),
            "Created analysis client"
        );

        Ok(Self {
            connection,
            codec: PayloadCodec::default(),
            monitor: EndpointMonitor::new(reporter, DEFAULT_LOCALE),
            default_retry: DEFAULT_RETRY_DELAY,
        })
    }

    /// Create a client with an HTTP transport from configuration.
    pub fn from_config(
        config: &ClientConfig,
        identity: ClientIdentity,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<Self> {
        // Validate the endpoint before building any network resources
        let endpoint = config.require_endpoint()?;
        if endpoint.trim().is_empty() {
            return Err(ApiPortError::Config(
                "Service base address must not be empty".to_string(),
            ));
        }

        let transport = Arc::new(HttpTransport::new(config.timeout())?);

        Ok(Self::new(endpoint, transport, identity, reporter)?
            .with_compression(config.compression)
            .with_default_retry(config.default_retry())
            .with_locale(config.locale.clone()))
    }

    /// Compress analysis requests with `compression`
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.codec = PayloadCodec::new(compression);
        self
    }

    /// Poll delay used when the service gives no usable `Retry-After`.
    ///
    /// Zero is replaced by [`DEFAULT_RETRY_DELAY`] so polling never spins.
    pub fn with_default_retry(mut self, delay: Duration) -> Self {
        self.default_retry = if delay.is_zero() {
            DEFAULT_RETRY_DELAY
        } else {
            delay
        };
        self
    }

    /// Language for progress messages
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.monitor = self.monitor.with_locale(locale);
        self
    }

    /// Underlying connection
    pub fn connection(&self) -> &ServiceConnection {
        &self.connection
    }

    /// Poll delay fallback
    pub fn default_retry(&self) -> Duration {
        self.default_retry
    }

    /// Compression used for analysis requests
    pub fn compression(&self) -> Compression {
        self.codec.compression()
    }

    /// Release the client and, if this was the last owner, its connection pool.
    ///
    /// Consumes the client, so a second release cannot be expressed.
    pub fn close(self) {
        tracing::debug!(base = %self.connection.base(), "Closing analysis client");
        drop(self);
    }

    /// Send one request and run the lifecycle check on whatever comes back.
    async fn exchange(
        &self,
        request: http::Request<Bytes>,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>> {
        let response = cancellable(cancel, self.connection.send(request)).await?;
        self.monitor.inspect(response.headers());
        Ok(response)
    }

    /// Decode a structured response body, honoring `Content-Encoding`.
    fn decode<T: DeserializeOwned>(&self, response: &http::Response<Bytes>) -> Result<T> {
        let encoding = header_str(response.headers(), CONTENT_ENCODING);
        self.codec.decode_body(encoding, response.body())
    }

    /// Strip transport compression from an opaque body.
    fn decode_raw(&self, response: http::Response<Bytes>) -> Result<Bytes> {
        let encoding = header_str(response.headers(), CONTENT_ENCODING);
        match Compression::from_content_encoding(encoding)? {
            Compression::Identity => Ok(response.into_body()),
            compression => Ok(Bytes::from(
                self.codec.decompress(compression, response.body())?,
            )),
        }
    }
}

/// Race `future` against cancellation.
async fn cancellable<F, T>(cancel: &CancellationToken, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ApiPortError::Cancelled),
        result = future => result,
    }
}

/// Sleep without holding a thread, aborting early on cancellation.
async fn wait(cancel: &CancellationToken, delay: Duration) -> Result<()> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ApiPortError::Cancelled),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}

fn service_error(response: http::Response<Bytes>) -> ApiPortError {
    let status = response.status();
    tracing::debug!(status = status.as_u16(), "Service returned failure status");
    ApiPortError::Service {
        status,
        body: response.into_body(),
    }
}

fn header_str(headers: &HeaderMap, name: http::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::config::ClientConfig;
    use crate::progress::CollectingReporter;
    use http::StatusCode;

    #[test]
    fn test_construction_fails_fast_on_bad_address() {
        let reporter = Arc::new(CollectingReporter::new());
        for base in ["", "  ", "relative/path"] {
            let transport = ScriptedTransport::new(vec![]);
            let err = ApiPortClient::new(
                base,
                transport.clone(),
                ClientIdentity::new("t", "1"),
                reporter.clone(),
            )
            .unwrap_err();
            assert!(matches!(err, ApiPortError::Config(_)), "{base:?}");
            assert!(transport.requests().is_empty());
        }
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let reporter = Arc::new(CollectingReporter::new());
        let identity = ClientIdentity::new("t", "1");

        let missing = ClientConfig::default();
        let err = ApiPortClient::from_config(&missing, identity.clone(), reporter.clone())
            .unwrap_err();
        assert!(matches!(err, ApiPortError::Config(_)));

        let blank = ClientConfig {
            endpoint: Some("   ".to_string()),
            ..Default::default()
        };
        let err = ApiPortClient::from_config(&blank, identity, reporter).unwrap_err();
        assert!(matches!(err, ApiPortError::Config(_)));
    }

    #[test]
    fn test_from_config_applies_settings() {
        let config = ClientConfig {
            endpoint: Some("http://localhost:5000".to_string()),
            default_retry_secs: 0.25,
            compression: Compression::Brotli,
            locale: "fr".to_string(),
            ..Default::default()
        };
        let client = ApiPortClient::from_config(
            &config,
            ClientIdentity::this_crate(),
            Arc::new(CollectingReporter::new()),
        )
        .unwrap();

        assert_eq!(client.compression(), Compression::Brotli);
        assert_eq!(client.default_retry(), Duration::from_millis(250));
        assert_eq!(client.connection().base().as_str(), "http://localhost:5000/");
        client.close();
    }

    #[test]
    fn test_zero_default_retry_is_replaced() {
        let (client, _, _) = client(vec![]).unwrap();
        let client = client.with_default_retry(Duration::ZERO);
        assert_eq!(client.default_retry(), DEFAULT_RETRY_DELAY);
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let (client, transport, _) = client(vec![respond(StatusCode::OK, &[], b"[]")]).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .get_targets_with_cancellation(&cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(transport.requests().is_empty());
    }
}
