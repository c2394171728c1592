use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use super::CodecError;

// Accepts what browser atob accepts: padded or unpadded input and
// non-canonical trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Standard base64 text to the URL-safe alphabet, padding removed.
pub fn to_url_safe(standard: &str) -> String {
    standard
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// URL-safe text back to padded standard base64. ASCII whitespace is dropped
/// so wrapped pastes still decode.
pub fn from_url_safe(url_safe: &str) -> String {
    let mut out: String = url_safe
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let pad = (4 - out.len() % 4) % 4;
    out.extend(std::iter::repeat('=').take(pad));
    out
}

pub fn encode_url_safe(bytes: &[u8]) -> String {
    to_url_safe(&STANDARD.encode(bytes))
}

pub fn decode_url_safe(token: &str) -> Result<Vec<u8>, CodecError> {
    Ok(LENIENT.decode(from_url_safe(token))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_is_restored_to_multiple_of_four() {
        assert_eq!(from_url_safe("YQ"), "YQ==");
        assert_eq!(from_url_safe("YWI"), "YWI=");
        assert_eq!(from_url_safe("YWJj"), "YWJj");
        assert_eq!(from_url_safe(""), "");
    }

    #[test]
    fn alphabet_substitution_both_ways() {
        assert_eq!(to_url_safe("+/+/a=="), "-_-_a");
        assert_eq!(from_url_safe("-_-_"), "+/+/");
    }

    #[test]
    fn high_bytes_survive() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let token = encode_url_safe(&bytes);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(decode_url_safe(&token).expect("decode"), bytes);
    }

    #[test]
    fn standard_padded_input_and_wrapped_lines_decode() {
        let std_text = STANDARD.encode([0xFBu8, 0xFF, 0x10]);
        assert_eq!(std_text, "+/8Q");
        assert_eq!(
            decode_url_safe("+/8Q").expect("standard"),
            vec![0xFB, 0xFF, 0x10]
        );
        assert_eq!(decode_url_safe("YW\nJj").expect("wrapped"), b"abc".to_vec());
        assert_eq!(decode_url_safe("YQ==").expect("padded"), b"a".to_vec());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_url_safe("not-valid-base64!!").is_err());
        assert!(decode_url_safe("a").is_err());
    }
}
