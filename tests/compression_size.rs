use classlinkd::codec::{self, legacy, CompressionLevel};
use serde_json::{json, Map, Value};

fn class_export(students: usize) -> Value {
    let mut attendance = Map::new();
    let mut grades = Map::new();
    for i in 0..students {
        let name = format!("طالب رقم {}", i + 1);
        attendance.insert(
            name.clone(),
            json!({ "present": i % 5 != 0, "lateMinutes": if i % 3 == 0 { json!(10) } else { json!("") } }),
        );
        grades.insert(name, json!(format!("{}", 1 + i % 3)));
    }
    json!({
        "metadata": {
            "schoolName": "مدرسة النور",
            "className": "الفوج الرابع",
            "date": { "raw": "2025-02-01", "formatted": "السبت، 1 فبراير 2025 م" }
        },
        "attendance": attendance,
        "homework": { "assignments": [] },
        "previousHomework": { "حفظ": grades }
    })
}

#[test]
fn compressed_token_is_shorter_for_realistic_payload() {
    let payload = class_export(12);
    let json_len = serde_json::to_string(&payload).expect("json").len();
    assert!(json_len >= 500, "fixture too small: {json_len}");

    let legacy_token = legacy::encode(&payload).expect("legacy");
    for level in [CompressionLevel::Default, CompressionLevel::Best] {
        let compressed = codec::compress_with(&payload, level);
        assert!(
            compressed.len() < legacy_token.len(),
            "compressed {} >= legacy {} at {}",
            compressed.len(),
            legacy_token.len(),
            level
        );
    }
}

#[test]
fn compression_gain_grows_with_class_size() {
    let small = class_export(12);
    let large = class_export(40);
    let ratio = |p: &Value| {
        codec::compress(p).len() as f64 / legacy::encode(p).expect("legacy").len() as f64
    };
    assert!(ratio(&large) < ratio(&small));
    assert!(ratio(&large) < 0.5);
}
