use classlinkd::codec::{self, legacy, CodecError, TokenFormat};
use serde_json::json;

fn roster() -> serde_json::Value {
    json!({
        "schoolName": "مدرسة النور",
        "className": "الصف الخامس",
        "students": ["سارة", "ليلى", "Omar"],
        "teachers": ["أ. خالد"]
    })
}

#[test]
fn unified_decodes_both_formats() {
    let payload = roster();

    let compressed = codec::compress(&payload);
    assert_eq!(codec::decode_unknown(&compressed), Some(payload.clone()));

    let legacy_token = legacy::encode(&payload).expect("encode");
    assert_eq!(codec::decode_unknown(&legacy_token), Some(payload));
}

#[test]
fn unified_reports_which_format_matched() {
    let payload = roster();
    let compressed = codec::compress(&payload);
    let legacy_token = legacy::encode(&payload).expect("encode");

    let (_, format) = codec::decode_unknown_with_format(&compressed).expect("compressed");
    assert_eq!(format, TokenFormat::Compressed);
    let (_, format) = codec::decode_unknown_with_format(&legacy_token).expect("legacy");
    assert_eq!(format, TokenFormat::Legacy);
}

#[test]
fn legacy_token_fails_inflate_not_base64() {
    let legacy_token = legacy::encode(&roster()).expect("encode");
    let e = codec::compressed::try_decompress(&legacy_token).expect_err("not compressed");
    assert!(e.is_inflate_failure(), "unexpected error: {e}");
}

#[test]
fn unified_accepts_legacy_share_link() {
    let payload = roster();
    let token = legacy::encode(&payload).expect("encode");
    let url = format!("https://example.test/exam?data={}", token);
    assert_eq!(codec::decode_unknown(&url), Some(payload));
}

#[test]
fn failures_are_contained() {
    assert_eq!(codec::decompress(""), None);
    assert_eq!(codec::decompress_value(&serde_json::Value::Null), None);
    assert_eq!(codec::decompress("not-valid-base64!!"), None);
    assert_eq!(legacy::decode(""), None);
    assert_eq!(legacy::decode("not-valid-base64!!"), None);
    assert_eq!(codec::decode_unknown(""), None);
    assert_eq!(codec::decode_unknown("%E0%A4%A"), None);
    assert_eq!(codec::decode_unknown("@@@@"), None);
}

#[test]
fn empty_token_has_its_own_error() {
    assert!(matches!(
        codec::compressed::try_decompress(""),
        Err(CodecError::EmptyToken)
    ));
    assert!(matches!(legacy::try_decode(""), Err(CodecError::EmptyToken)));
}

#[test]
fn truncated_compressed_token_is_rejected() {
    let payload = json!({ "notes": "x".repeat(400), "more": "y".repeat(400) });
    let token = codec::compress(&payload);
    let cut = &token[..token.len() / 2];
    assert_eq!(codec::decompress(cut), None);
}

#[test]
fn valid_base64_that_is_not_json_fails_legacy() {
    // "hello" in base64: decodes to text but not JSON.
    assert_eq!(legacy::decode("aGVsbG8"), None);
    assert_eq!(codec::decode_unknown("aGVsbG8"), None);
}

#[test]
fn legacy_decode_replaces_invalid_utf8() {
    let token = codec::encode_url_safe(b"{\"note\":\"ok \xff\"}");
    let expected = json!({ "note": "ok \u{FFFD}" });
    assert_eq!(legacy::decode(&token), Some(expected.clone()));
    assert_eq!(
        codec::decode_unknown_with_format(&token),
        Some((expected, TokenFormat::Legacy))
    );
}
