//! Payload codec: structured serialization plus compression.
//!
//! # Algorithms
//!
//! | Algorithm       | `Content-Encoding` | Backend |
//! |-----------------|--------------------|---------|
//! | [`Gzip`]        | `gzip`             | flate2  |
//! | [`Deflate`]     | `deflate`          | flate2  |
//! | [`Brotli`]      | `br`               | brotli  |
//! | [`Identity`]    | (absent)           | none    |
//!
//! # Usage
//!
//! ```rust,ignore
//! use apiport::codec::{Compression, PayloadCodec};
//!
//! let codec = PayloadCodec::new(Compression::Gzip);
//! let bytes = codec.serialize_compress(&request)?;
//! let back: AnalyzeRequest = codec.decompress_deserialize(&bytes)?;
//! assert_eq!(back, request);
//! ```
//!
//! [`Gzip`]: Compression::Gzip
//! [`Deflate`]: Compression::Deflate
//! [`Brotli`]: Compression::Brotli
//! [`Identity`]: Compression::Identity

mod algorithm;
mod brotli;
mod flate;
mod payload;

pub use algorithm::Compression;
pub use brotli::BrotliCodec;
pub use flate::{FlateCodec, FlateFormat};
pub use payload::{PayloadCodec, JSON_CONTENT_TYPE};
