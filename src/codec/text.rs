use super::CodecError;

pub fn string_to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Strict inverse of [`string_to_bytes`].
pub fn bytes_to_string(bytes: &[u8]) -> Result<String, CodecError> {
    Ok(std::str::from_utf8(bytes)?.to_string())
}

/// Invalid sequences become U+FFFD instead of failing.
pub fn bytes_to_string_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
