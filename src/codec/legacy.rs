//! Uncompressed token format, kept so links handed out before compression
//! existed keep opening.

use super::base64url::{decode_url_safe, encode_url_safe};
use super::text::{bytes_to_string_lossy, string_to_bytes};
use super::{CodecError, Payload};

const DATA_PARAM_MARKER: &str = "?data=";

pub fn try_encode(payload: &Payload) -> Result<String, CodecError> {
    let json = serde_json::to_string(payload).map_err(CodecError::Serialize)?;
    Ok(encode_url_safe(&string_to_bytes(&json)))
}

pub fn encode(payload: &Payload) -> Option<String> {
    match try_encode(payload) {
        Ok(token) => Some(token),
        Err(e) => {
            tracing::warn!(error = %e, "legacy encode failed");
            None
        }
    }
}

/// Accepts a bare token or a full share link containing `?data=`. Invalid
/// UTF-8 becomes U+FFFD, as browser decoders do.
pub fn try_decode(token: &str) -> Result<Payload, CodecError> {
    let data = token.split(DATA_PARAM_MARKER).nth(1).unwrap_or(token);
    if data.trim().is_empty() {
        return Err(CodecError::EmptyToken);
    }
    let bytes = decode_url_safe(data)?;
    let json = bytes_to_string_lossy(&bytes);
    serde_json::from_str(&json).map_err(CodecError::Json)
}

pub fn decode(token: &str) -> Option<Payload> {
    match try_decode(token) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::debug!(error = %e, "legacy decode failed");
            None
        }
    }
}
