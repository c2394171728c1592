//! State-transfer codec.
//!
//! Two token formats coexist because links from both eras are still being
//! pasted around:
//!
//! - legacy: compact JSON, UTF-8, URL-safe base64 without padding.
//! - compressed: JSON (or a bare string), zlib/DEFLATE, URL-safe base64
//!   without padding, then URI component encoding.
//!
//! Tokens carry no format tag. [`decode_unknown`] tries the compressed format
//! first and falls back to the legacy one.

mod base64url;
pub mod compressed;
mod error;
pub mod legacy;
mod text;
mod unified;

pub use base64url::{decode_url_safe, encode_url_safe, from_url_safe, to_url_safe};
pub use compressed::{compress, compress_with, decompress, decompress_value, CompressionLevel};
pub use error::CodecError;
pub use text::{bytes_to_string, bytes_to_string_lossy, string_to_bytes};
pub use unified::{decode_unknown, decode_unknown_with_format, TokenFormat};

/// Any JSON value. The codec never looks inside it.
pub type Payload = serde_json::Value;
