//! Bound connection to one service base address.
//!
//! Stamps client identity headers on every outbound request so the service
//! can make protocol decisions per client generation.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use reqwest::Url;

use super::Transport;
use crate::error::{ApiPortError, Result};
use crate::protocol::{CLIENT_TYPE_HEADER, CLIENT_VERSION_HEADER};

/// Who is calling: sent as `Client-Type` / `Client-Version` on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Client implementation name
    pub name: String,
    /// Client implementation version
    pub version: String,
}

impl ClientIdentity {
    /// Create identity
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Identity of this crate
    pub fn this_crate() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), crate::VERSION)
    }
}

/// Transport bound to a base address and a client identity.
#[derive(Clone)]
pub struct ServiceConnection {
    base: Url,
    transport: Arc<dyn Transport>,
    identity: ClientIdentity,
    client_type: HeaderValue,
    client_version: HeaderValue,
}

impl std::fmt::Debug for ServiceConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConnection")
            .field("base", &self.base.as_str())
            .field("transport", &self.transport.name())
            .field("identity", &self.identity)
            .finish()
    }
}

impl ServiceConnection {
    /// Bind `transport` to `base_address`.
    ///
    /// Fails with [`ApiPortError::Config`] before touching the network when the
    /// address is empty, whitespace, not absolute, or not http(s), or when
    /// the identity cannot be sent as header values.
    pub fn new(
        base_address: &str,
        transport: Arc<dyn Transport>,
        identity: ClientIdentity,
    ) -> Result<Self> {
        let base = parse_base_address(base_address)?;

        let client_type = identity_header("client name", &identity.name)?;
        let client_version = identity_header("client version", &identity.version)?;

        Ok(Self {
            base,
            transport,
            identity,
            client_type,
            client_version,
        })
    }

    /// Normalized base address (always ends with `/`)
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Identity stamped on requests
    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Name of the underlying transport
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Resolve a service-relative path against the base address.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiPortError::InvalidArgument(format!("Invalid path {path:?}: {e}")))
    }

    /// Build a request for an absolute `uri` with extra headers and a body.
    pub fn request(
        &self,
        method: Method,
        uri: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<http::Request<Bytes>> {
        let mut request = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .map_err(|e| ApiPortError::InvalidArgument(format!("Invalid request to {uri}: {e}")))?;
        request.headers_mut().extend(headers);
        Ok(request)
    }

    /// GET a service-relative path.
    pub fn get(&self, path: &str) -> Result<http::Request<Bytes>> {
        let url = self.endpoint(path)?;
        self.request(Method::GET, url.as_str(), HeaderMap::new(), Bytes::new())
    }

    /// POST a body to a service-relative path.
    pub fn post(
        &self,
        path: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<http::Request<Bytes>> {
        let url = self.endpoint(path)?;
        self.request(Method::POST, url.as_str(), headers, body)
    }

    /// Stamp identity headers and send.
    pub async fn send(&self, mut request: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let headers = request.headers_mut();
        headers.insert(
            HeaderName::from_static(CLIENT_TYPE_HEADER),
            self.client_type.clone(),
        );
        headers.insert(
            HeaderName::from_static(CLIENT_VERSION_HEADER),
            self.client_version.clone(),
        );

        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            bytes = request.body().len(),
            "Sending request"
        );

        let response = self.transport.send(request).await?;

        tracing::debug!(
            status = response.status().as_u16(),
            bytes = response.body().len(),
            "Received response"
        );

        Ok(response)
    }
}

fn parse_base_address(base_address: &str) -> Result<Url> {
    let trimmed = base_address.trim();
    if trimmed.is_empty() {
        return Err(ApiPortError::Config(
            "Service base address must not be empty".to_string(),
        ));
    }

    let mut url = Url::parse(trimmed).map_err(|e| {
        ApiPortError::Config(format!("Invalid service base address {trimmed:?}: {e}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiPortError::Config(format!(
            "Service base address must be an absolute http(s) URL: {trimmed}"
        )));
    }

    // Url::join replaces the last segment unless the path ends with '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

fn identity_header(what: &str, value: &str) -> Result<HeaderValue> {
    if value.trim().is_empty() {
        return Err(ApiPortError::Config(format!("{what} must not be empty")));
    }
    HeaderValue::from_str(value)
        .map_err(|e| ApiPortError::Config(format!("{what} is not a valid header value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::SendFuture;

    struct Unreachable;

    impl Transport for Unreachable {
        fn send(&self, _request: http::Request<Bytes>) -> SendFuture<'_> {
            panic!("no network activity expected")
        }

        fn name(&self) -> &'static str {
            "unreachable"
        }
    }

    fn connect(base: &str) -> Result<ServiceConnection> {
        ServiceConnection::new(base, Arc::new(Unreachable), ClientIdentity::new("tests", "1.0"))
    }

    #[test]
    fn test_rejects_blank_base_address() {
        for base in ["", "   ", "\t\n"] {
            let err = connect(base).unwrap_err();
            assert!(matches!(err, ApiPortError::Config(_)), "{base:?}");
        }
    }

    #[test]
    fn test_rejects_relative_and_non_http() {
        for base in ["api/analyze", "/root", "ftp://example.com", "mailto:a@b.c"] {
            let err = connect(base).unwrap_err();
            assert!(matches!(err, ApiPortError::Config(_)), "{base:?}");
        }
    }

    #[test]
    fn test_rejects_empty_identity() {
        let err = ServiceConnection::new(
            "http://localhost",
            Arc::new(Unreachable),
            ClientIdentity::new("", "1.0"),
        )
        .unwrap_err();
        assert!(matches!(err, ApiPortError::Config(_)));
    }

    #[test]
    fn test_endpoint_resolution_keeps_base_path() {
        let conn = connect(" https://svc.example.com/portability ").unwrap();
        assert_eq!(conn.base().as_str(), "https://svc.example.com/portability/");
        assert_eq!(
            conn.endpoint("api/analyze").unwrap().as_str(),
            "https://svc.example.com/portability/api/analyze"
        );
        assert_eq!(
            conn.endpoint("/api/target").unwrap().as_str(),
            "https://svc.example.com/portability/api/target"
        );
    }

    #[test]
    fn test_post_request_shape() {
        let conn = connect("http://localhost:8080").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request = conn
            .post("api/analyze", headers, Bytes::from_static(b"{}"))
            .unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri(), "http://localhost:8080/api/analyze");
        assert_eq!(request.headers()[http::header::CONTENT_TYPE], "application/json");
        assert_eq!(request.body().as_ref(), b"{}");
    }
}
