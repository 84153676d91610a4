//! Structured payload codec: JSON serialization plus a compression pass.
//!
//! Outbound analysis requests always go through [`PayloadCodec::serialize_compress`].
//! Inbound bodies are only decompressed when the response declares a
//! `Content-Encoding`; see [`PayloadCodec::decode_body`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::brotli::BrotliCodec;
use super::flate::FlateCodec;
use super::Compression;
use crate::error::{ApiPortError, Result};

/// MIME type of the structured payload before compression
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Payload codec
#[derive(Debug, Clone)]
pub struct PayloadCodec {
    compression: Compression,
    gzip: FlateCodec,
    zlib: FlateCodec,
    brotli: BrotliCodec,
}

impl Default for PayloadCodec {
    fn default() -> Self {
        Self::new(Compression::default())
    }
}

impl PayloadCodec {
    /// Create codec compressing with the given algorithm
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            gzip: FlateCodec::gzip(),
            zlib: FlateCodec::zlib(),
            brotli: BrotliCodec::new(),
        }
    }

    /// Algorithm used for outbound payloads
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// `Content-Encoding` value matching [`Self::serialize_compress`] output
    pub fn content_encoding(&self) -> Option<&'static str> {
        self.compression.content_encoding()
    }

    /// Serialize `value` to JSON and compress it.
    pub fn serialize_compress<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(value)
            .map_err(|e| ApiPortError::InvalidArgument(format!("Cannot serialize payload: {e}")))?;
        self.compress(self.compression, &json)
    }

    /// Decompress and deserialize bytes produced by [`Self::serialize_compress`].
    pub fn decompress_deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        let json = self.decompress(self.compression, data)?;
        Ok(serde_json::from_slice(&json)?)
    }

    /// Decode a response body, decompressing according to its declared encoding.
    pub fn decode_body<T: DeserializeOwned>(
        &self,
        content_encoding: Option<&str>,
        body: &[u8],
    ) -> Result<T> {
        let compression = Compression::from_content_encoding(content_encoding)?;
        let json = self.decompress(compression, body)?;
        Ok(serde_json::from_slice(&json)?)
    }

    /// Compress raw bytes with a specific algorithm
    pub fn compress(&self, compression: Compression, data: &[u8]) -> Result<Vec<u8>> {
        match compression {
            Compression::Identity => Ok(data.to_vec()),
            Compression::Gzip => self.gzip.compress(data),
            Compression::Deflate => self.zlib.compress(data),
            Compression::Brotli => self.brotli.compress(data),
        }
    }

    /// Decompress raw bytes with a specific algorithm
    pub fn decompress(&self, compression: Compression, data: &[u8]) -> Result<Vec<u8>> {
        match compression {
            Compression::Identity => Ok(data.to_vec()),
            Compression::Gzip => self.gzip.decompress(data),
            Compression::Deflate => self.zlib.decompress(data),
            Compression::Brotli => self.brotli.decompress(data),
        }
    }
}
