//! Out-of-band response signals: endpoint lifecycle and retry-after.

use std::time::Duration;

use http::HeaderMap;

use super::{ENDPOINT_STATUS_HEADER, RETRY_AFTER_HEADER};

/// Lifecycle status the service reports for the endpoint itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EndpointStatus {
    /// Endpoint is fully supported
    Normal,
    /// Endpoint still works but is scheduled for removal
    Deprecated,
}

impl EndpointStatus {
    /// Read the status header.
    ///
    /// Returns `None` when the header is absent, not valid UTF-8, or carries a
    /// value this client does not know.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(ENDPOINT_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
    }

    /// Get descriptive name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Deprecated => "Deprecated",
        }
    }
}

impl std::fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for EndpointStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "alive" => Ok(Self::Normal),
            "deprecated" => Ok(Self::Deprecated),
            _ => Err(format!("Unknown endpoint status: {}", s)),
        }
    }
}

/// Server-directed delay before the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDirective {
    delay: Duration,
}

impl RetryDirective {
    /// Read `Retry-After` as decimal seconds.
    ///
    /// A missing, unparsable, or non-positive value falls back to `default`.
    pub fn from_headers(headers: &HeaderMap, default: Duration) -> Self {
        let delay = headers
            .get(RETRY_AFTER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|d| !d.is_zero())
            .unwrap_or(default);

        Self { delay }
    }

    /// How long to wait
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    const DEFAULT: Duration = Duration::from_secs(1);

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_endpoint_status_parsing() {
        let h = headers(ENDPOINT_STATUS_HEADER, "Deprecated");
        assert_eq!(EndpointStatus::from_headers(&h), Some(EndpointStatus::Deprecated));

        let h = headers(ENDPOINT_STATUS_HEADER, "normal");
        assert_eq!(EndpointStatus::from_headers(&h), Some(EndpointStatus::Normal));

        let h = headers(ENDPOINT_STATUS_HEADER, "sunset");
        assert_eq!(EndpointStatus::from_headers(&h), None);

        assert_eq!(EndpointStatus::from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_retry_after_seconds() {
        let h = headers(RETRY_AFTER_HEADER, "2");
        assert_eq!(
            RetryDirective::from_headers(&h, DEFAULT).delay(),
            Duration::from_secs(2)
        );

        let h = headers(RETRY_AFTER_HEADER, "0.1");
        assert_eq!(
            RetryDirective::from_headers(&h, DEFAULT).delay(),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_retry_after_falls_back_to_default() {
        assert_eq!(
            RetryDirective::from_headers(&HeaderMap::new(), DEFAULT).delay(),
            DEFAULT
        );
        for bad in ["0", "-3", "soon", "NaN", "inf"] {
            let h = headers(RETRY_AFTER_HEADER, bad);
            assert_eq!(
                RetryDirective::from_headers(&h, DEFAULT).delay(),
                DEFAULT,
                "value {bad:?}"
            );
        }
    }
}
