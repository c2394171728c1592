use classlinkd::codec::{self, legacy, CompressionLevel};
use serde_json::json;

fn weekly_payload() -> serde_json::Value {
    json!({
        "metadata": {
            "schoolName": "عمر بن الخطاب",
            "className": "الفوج الرابع",
            "date": { "raw": "2025-02-01", "formatted": "السبت، 1 فبراير 2025 م" }
        },
        "attendance": {
            "يونس الراوي": { "present": true, "lateMinutes": "" },
            "مهند مصطفى": { "present": true, "lateMinutes": 20 },
            "Sam O'Neil": { "present": false }
        },
        "homework": {
            "assignments": [
                { "type": "حفظ", "content": "الممتحنة ١-٣", "assignedStudents": ["يونس الراوي"] },
                { "type": "مراجعة قريبة", "content": "الحشر", "assignedStudents": null }
            ]
        },
        "previousHomework": { "حفظ": { "يونس الراوي": "1.3" } }
    })
}

#[test]
fn compressed_roundtrip_object() {
    let payload = weekly_payload();
    let token = codec::compress(&payload);
    assert!(!token.is_empty());
    assert_eq!(codec::decompress(&token), Some(payload));
}

#[test]
fn compressed_roundtrip_at_every_level() {
    let payload = weekly_payload();
    for level in [
        CompressionLevel::Fast,
        CompressionLevel::Default,
        CompressionLevel::Best,
        CompressionLevel::Precise(0),
        CompressionLevel::Precise(5),
    ] {
        let token = codec::compress_with(&payload, level);
        assert_eq!(
            codec::decompress(&token),
            Some(payload.clone()),
            "level {}",
            level
        );
    }
}

#[test]
fn compressed_plain_string_is_carried_raw() {
    let text = json!("رسالة الأسبوع: الحضور ممتاز");
    let token = codec::compress(&text);
    assert_eq!(codec::decompress(&token), Some(text));
}

#[test]
fn compressed_string_that_is_json_text_comes_back_parsed() {
    // A string payload is not quoted before compression, so JSON-looking
    // text decodes as the value it spells.
    let token = codec::compress(&json!("[1,2,3]"));
    assert_eq!(codec::decompress(&token), Some(json!([1, 2, 3])));
}

#[test]
fn compressed_scalars_and_arrays() {
    for payload in [json!(42), json!(true), json!(null), json!([1, "b", { "c": 3.5 }])] {
        let token = codec::compress(&payload);
        assert_eq!(codec::decompress(&token), Some(payload));
    }
}

#[test]
fn legacy_roundtrip() {
    let payload = json!({
        "schoolName": "Westside",
        "className": "Grade 4",
        "students": ["Amal", "Ben", "Chen"],
        "teachers": ["Ms. Diaz"]
    });
    let token = legacy::encode(&payload).expect("encode");
    assert!(!token.contains('='));
    assert_eq!(legacy::decode(&token), Some(payload));
}

#[test]
fn legacy_roundtrip_scalars() {
    for payload in [json!("plain"), json!(0), json!(false), json!(null), json!([])] {
        let token = legacy::encode(&payload).expect("encode");
        assert_eq!(legacy::decode(&token), Some(payload));
    }
}

#[test]
fn legacy_accepts_full_share_link() {
    let payload = json!({ "className": "الصف الرابع", "students": ["أحمد"] });
    let token = legacy::encode(&payload).expect("encode");
    let url = format!("https://example.test/weekly-message-generator?data={}", token);
    assert_eq!(legacy::decode(&url), Some(payload));
}

#[test]
fn unicode_fidelity_both_formats() {
    let payload = json!({
        "arabic": "مرحبا بالعالم",
        "emoji": "📚✏️👩‍🏫🎉",
        "mixed": "Grade 4 - الصف الرابع - 四年级 - 𝔘𝔫𝔦𝔠𝔬𝔡𝔢",
        "names": ["Zoë", "Ægir", "Ñandú", "محمد"]
    });

    let compressed = codec::compress(&payload);
    let decoded = codec::decompress(&compressed).expect("decompress");
    assert_eq!(decoded, payload);
    assert_eq!(decoded["emoji"].as_str(), Some("📚✏️👩‍🏫🎉"));

    let legacy_token = legacy::encode(&payload).expect("encode");
    let decoded = legacy::decode(&legacy_token).expect("decode");
    assert_eq!(decoded, payload);
    assert_eq!(
        decoded["mixed"].as_str(),
        Some("Grade 4 - الصف الرابع - 四年级 - 𝔘𝔫𝔦𝔠𝔬𝔡𝔢")
    );
}

#[test]
fn compressed_token_survives_manual_percent_decoding() {
    // A host that already unescaped the query value passes the raw
    // URL-safe text; that must decode too.
    let payload = weekly_payload();
    let token = codec::compress(&payload);
    let unescaped = urlencoding::decode(&token).expect("utf8").into_owned();
    assert_eq!(codec::decompress(&unescaped), Some(payload));
}

#[test]
fn fractional_grades_roundtrip_exactly() {
    let mut averages = Vec::new();
    for n in 1..=40u32 {
        for d in 1..=40u32 {
            averages.push(f64::from(n) / f64::from(d) * 10.0 / 3.0);
        }
    }
    averages.extend([
        0.1,
        1.0715660391465826e-75,
        0.23809523809523805,
        f64::MIN_POSITIVE,
        f64::MAX,
        -2.2250738585072014e-308,
        5e-324,
    ]);

    for avg in averages {
        let payload = json!({ "average": avg });
        let compressed = codec::compress(&payload);
        assert_eq!(codec::decompress(&compressed), Some(payload.clone()), "{avg:e}");
        let legacy_token = legacy::encode(&payload).expect("encode");
        assert_eq!(legacy::decode(&legacy_token), Some(payload), "{avg:e}");
    }
}
