//! Current token format: zlib-compressed, URL-safe base64, percent-encoded.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use serde::{Deserialize, Serialize};

use super::base64url::{decode_url_safe, encode_url_safe};
use super::text::{bytes_to_string_lossy, string_to_bytes};
use super::{CodecError, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompressionLevel {
    Fast,
    #[default]
    Default,
    Best,
    Precise(u8),
}

impl CompressionLevel {
    fn to_flate(self) -> Compression {
        match self {
            CompressionLevel::Fast => Compression::fast(),
            CompressionLevel::Default => Compression::default(),
            CompressionLevel::Best => Compression::best(),
            CompressionLevel::Precise(n) => Compression::new(u32::from(n)),
        }
    }
}

impl FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(CompressionLevel::Fast),
            "default" => Ok(CompressionLevel::Default),
            "best" | "max" => Ok(CompressionLevel::Best),
            other => match other.parse::<u8>() {
                Ok(n) if n <= 9 => Ok(CompressionLevel::Precise(n)),
                _ => Err(format!(
                    "compression level must be fast, default, best or 0-9 (got {s:?})"
                )),
            },
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionLevel::Fast => f.write_str("fast"),
            CompressionLevel::Default => f.write_str("default"),
            CompressionLevel::Best => f.write_str("best"),
            CompressionLevel::Precise(n) => write!(f, "{n}"),
        }
    }
}

impl TryFrom<String> for CompressionLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompressionLevel> for String {
    fn from(value: CompressionLevel) -> Self {
        value.to_string()
    }
}

pub(crate) fn deflate(input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), level.to_flate());
    encoder.write_all(input).map_err(CodecError::Deflate)?;
    encoder.finish().map_err(CodecError::Deflate)
}

/// Upper bound on the inflated text of a single token.
pub const MAX_INFLATED_LEN: usize = 32 * 1024 * 1024;

pub(crate) fn inflate(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    inflate_limited(input, MAX_INFLATED_LEN)
}

// The streaming reader reports a cut-off stream as a clean EOF, so drive the
// inflater directly and require StreamEnd.
fn inflate_limited(input: &[u8], limit: usize) -> Result<Vec<u8>, CodecError> {
    let mut inflater = Decompress::new(true);
    let initial = input.len().saturating_mul(4).max(64).min(limit.saturating_add(1));
    let mut out = Vec::with_capacity(initial);
    loop {
        if out.len() == out.capacity() {
            if out.len() > limit {
                return Err(CodecError::OutputTooLarge { limit });
            }
            // Capacity stays at most limit + 1.
            let room = out.capacity().max(64).min(limit + 1 - out.len());
            out.reserve_exact(room);
        }
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status =
            inflater.decompress_vec(&input[consumed..], &mut out, FlushDecompress::Finish)?;
        if out.len() > limit {
            return Err(CodecError::OutputTooLarge { limit });
        }
        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                let stalled =
                    inflater.total_in() as usize == consumed && inflater.total_out() == produced;
                if stalled {
                    return Err(CodecError::TruncatedStream);
                }
            }
        }
    }
}

fn payload_text(data: &Payload) -> Result<String, CodecError> {
    match data {
        Payload::String(s) => Ok(s.clone()),
        other => serde_json::to_string(other).map_err(CodecError::Serialize),
    }
}

pub fn try_compress(data: &Payload, level: CompressionLevel) -> Result<String, CodecError> {
    let text = payload_text(data)?;
    let compressed = deflate(&string_to_bytes(&text), level)?;
    let url_safe = encode_url_safe(&compressed);
    Ok(urlencoding::encode(&url_safe).into_owned())
}

/// Compresses at the default level. Returns an empty string on failure.
pub fn compress(data: &Payload) -> String {
    compress_with(data, CompressionLevel::Default)
}

pub fn compress_with(data: &Payload, level: CompressionLevel) -> String {
    match try_compress(data, level) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, %level, "compress failed");
            String::new()
        }
    }
}

pub fn try_decompress(token: &str) -> Result<Payload, CodecError> {
    if token.is_empty() {
        return Err(CodecError::EmptyToken);
    }
    let unescaped = urlencoding::decode(token)?;
    let compressed = decode_url_safe(&unescaped)?;
    let raw = inflate(&compressed)?;
    let text = bytes_to_string_lossy(&raw);
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(_) => Ok(Payload::String(text)),
    }
}

/// Never fails loudly: inflate errors are the expected signal that a token is
/// in the legacy format.
pub fn decompress(token: &str) -> Option<Payload> {
    match try_decompress(token) {
        Ok(payload) => Some(payload),
        Err(e) if e.is_inflate_failure() => {
            tracing::debug!(error = %e, "token is not a compressed stream");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "decompress failed");
            None
        }
    }
}

/// Entry point for untyped callers: anything but a non-empty JSON string is
/// rejected.
pub fn decompress_value(token: &Payload) -> Option<Payload> {
    token.as_str().and_then(decompress)
}
