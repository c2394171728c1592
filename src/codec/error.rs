use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("empty token")]
    EmptyToken,

    #[error("payload serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid percent-encoding: {0}")]
    PercentDecode(#[from] std::string::FromUtf8Error),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("deflate failed: {0}")]
    Deflate(#[source] std::io::Error),

    #[error("inflate failed: {0}")]
    Inflate(#[from] flate2::DecompressError),

    #[error("compressed stream ended before its end marker")]
    TruncatedStream,

    #[error("decompressed payload exceeds {limit} bytes")]
    OutputTooLarge { limit: usize },

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
}

impl CodecError {
    /// Inflate failures are the normal outcome when a legacy token is run
    /// through the compressed decoder.
    pub fn is_inflate_failure(&self) -> bool {
        matches!(
            self,
            CodecError::Inflate(_) | CodecError::TruncatedStream | CodecError::OutputTooLarge { .. }
        )
    }
}
