use serde::{Deserialize, Serialize};

use super::{compressed, legacy, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenFormat {
    Compressed,
    Legacy,
}

/// Compressed first, legacy second. The order is part of the contract: tokens
/// carry no format tag.
pub fn decode_unknown_with_format(token: &str) -> Option<(Payload, TokenFormat)> {
    if let Some(payload) = compressed::decompress(token) {
        return Some((payload, TokenFormat::Compressed));
    }
    if let Some(payload) = legacy::decode(token) {
        return Some((payload, TokenFormat::Legacy));
    }
    tracing::debug!(token_len = token.len(), "token matched no known format");
    None
}

pub fn decode_unknown(token: &str) -> Option<Payload> {
    decode_unknown_with_format(token).map(|(payload, _)| payload)
}
