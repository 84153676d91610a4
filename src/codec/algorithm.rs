//! Compression algorithm selection and HTTP content-encoding mapping.

use serde::{Deserialize, Serialize};

use crate::error::{ApiPortError, Result};

/// Compression applied to structured payloads on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// No compression (passthrough)
    Identity,
    /// Gzip (RFC 1952), default for outbound analysis requests
    #[default]
    Gzip,
    /// Zlib-wrapped deflate (RFC 1950)
    Deflate,
    /// Brotli (RFC 7932)
    Brotli,
}

impl Compression {
    /// Value for the `Content-Encoding` header, `None` for identity.
    pub fn content_encoding(&self) -> Option<&'static str> {
        match self {
            Compression::Identity => None,
            Compression::Gzip => Some("gzip"),
            Compression::Deflate => Some("deflate"),
            Compression::Brotli => Some("br"),
        }
    }

    /// Parse a `Content-Encoding` header value.
    ///
    /// Absent or empty header means identity. Unknown encodings are a decode
    /// error: the body cannot be trusted to be what we think it is.
    pub fn from_content_encoding(value: Option<&str>) -> Result<Self> {
        let value = match value.map(str::trim) {
            None | Some("") => return Ok(Compression::Identity),
            Some(v) => v,
        };

        match value.to_ascii_lowercase().as_str() {
            "identity" => Ok(Compression::Identity),
            "gzip" | "x-gzip" => Ok(Compression::Gzip),
            "deflate" => Ok(Compression::Deflate),
            "br" => Ok(Compression::Brotli),
            other => Err(ApiPortError::Decode(format!(
                "Unsupported content encoding: {other}"
            ))),
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Compression::Identity => "IDENTITY",
            Compression::Gzip => "GZIP",
            Compression::Deflate => "DEFLATE",
            Compression::Brotli => "BROTLI",
        }
    }

    /// All algorithms in preference order
    pub fn all() -> &'static [Compression] {
        &[
            Compression::Gzip,
            Compression::Brotli,
            Compression::Deflate,
            Compression::Identity,
        ]
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "identity" => Ok(Self::Identity),
            "gzip" | "gz" => Ok(Self::Gzip),
            "deflate" | "zlib" => Ok(Self::Deflate),
            "brotli" | "br" => Ok(Self::Brotli),
            _ => Err(format!("Unknown compression: {}", s)),
        }
    }
}
