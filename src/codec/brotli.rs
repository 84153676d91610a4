//! Brotli compression codec (`Content-Encoding: br`).

use brotli::{CompressorWriter, Decompressor};
use std::io::{Read, Write};

use crate::error::{ApiPortError, Result};

/// Brotli compression quality (0-11, higher = better compression, slower)
const DEFAULT_QUALITY: u32 = 9;

/// Window size for Brotli (larger = better compression for large files)
const DEFAULT_WINDOW_SIZE: u32 = 22;

/// Buffer size for the streaming compressor/decompressor
const BUFFER_SIZE: usize = 4096;

/// Brotli codec
#[derive(Debug, Clone)]
pub struct BrotliCodec {
    /// Compression quality (0-11)
    pub quality: u32,
    /// Window size (10-24)
    pub window_size: u32,
}

impl Default for BrotliCodec {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl BrotliCodec {
    /// Create new Brotli codec with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create codec with custom quality
    pub fn with_quality(quality: u32) -> Self {
        Self {
            quality: quality.min(11),
            ..Default::default()
        }
    }

    /// Compress bytes to Brotli format
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut compressed = Vec::new();
        {
            let mut writer =
                CompressorWriter::new(&mut compressed, BUFFER_SIZE, self.quality, self.window_size);
            writer.write_all(data)?;
        }
        Ok(compressed)
    }

    /// Decompress Brotli bytes
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decompressor = Decompressor::new(data, BUFFER_SIZE);
        let mut decompressed = Vec::new();
        decompressor
            .read_to_end(&mut decompressed)
            .map_err(|e| ApiPortError::Decode(format!("Brotli: {e}")))?;
        Ok(decompressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_roundtrip() {
        let codec = BrotliCodec::new();
        let original = br#"{"ApplicationName":"app","Targets":[".NET Core,Version=v2.0"]}"#;

        let compressed = codec.compress(original).unwrap();
        let decompressed = codec.decompress(&compressed).unwrap();

        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_repetitive_content_shrinks() {
        let codec = BrotliCodec::with_quality(11);
        let original = "System.String.Concat(System.String,System.String)".repeat(50);

        let compressed = codec.compress(original.as_bytes()).unwrap();
        assert!(compressed.len() < original.len());
    }
}
