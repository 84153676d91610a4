//! Gzip and zlib-deflate codecs backed by flate2.

use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};

use crate::error::{ApiPortError, Result};

/// Framing used around the deflate stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlateFormat {
    /// Gzip header and CRC trailer
    Gzip,
    /// Zlib header and Adler-32 trailer
    Zlib,
}

/// Flate codec
#[derive(Debug, Clone)]
pub struct FlateCodec {
    format: FlateFormat,
    level: flate2::Compression,
}

impl FlateCodec {
    /// Gzip codec with default level
    pub fn gzip() -> Self {
        Self {
            format: FlateFormat::Gzip,
            level: flate2::Compression::default(),
        }
    }

    /// Zlib codec with default level
    pub fn zlib() -> Self {
        Self {
            format: FlateFormat::Zlib,
            level: flate2::Compression::default(),
        }
    }

    /// Override compression level (0-9)
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = flate2::Compression::new(level.min(9));
        self
    }

    /// Framing used by this codec
    pub fn format(&self) -> FlateFormat {
        self.format
    }

    /// Compress bytes
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.format {
            FlateFormat::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), self.level);
                encoder.write_all(data)?;
                Ok(encoder.finish()?)
            },
            FlateFormat::Zlib => {
                let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
                encoder.write_all(data)?;
                Ok(encoder.finish()?)
            },
        }
    }

    /// Decompress bytes
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decompressed = Vec::new();
        let read = match self.format {
            FlateFormat::Gzip => GzDecoder::new(data).read_to_end(&mut decompressed),
            FlateFormat::Zlib => ZlibDecoder::new(data).read_to_end(&mut decompressed),
        };
        read.map_err(|e| ApiPortError::Decode(format!("{:?}: {e}", self.format)))?;
        Ok(decompressed)
    }
}
