//! Header-wrapped report exports.
//!
//! The weekly report is copied to the clipboard as a few human-readable
//! `label: value` lines, a `---` line, and a compressed token. Labels are
//! localized, so callers pass the set they recognize.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec::{self, CodecError, CompressionLevel, Payload, TokenFormat};

pub const FIELD_CLASS_NAME: &str = "className";
pub const FIELD_DATE: &str = "date";

const DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLabels {
    pub class_label: String,
    pub date_label: String,
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            class_label: "فصل".to_string(),
            date_label: "التاريخ".to_string(),
        }
    }
}

impl HeaderLabels {
    fn field_for(&self, label: &str) -> Option<&'static str> {
        if label == self.class_label {
            Some(FIELD_CLASS_NAME)
        } else if label == self.date_label {
            Some(FIELD_DATE)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderedToken {
    pub header: BTreeMap<String, String>,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedReport {
    pub header: BTreeMap<String, String>,
    pub payload: Payload,
    pub format: TokenFormat,
}

/// Byte offset of the first line that is exactly `---` and ends with a
/// newline, together with the offset just past that newline.
fn find_delimiter(text: &str) -> Option<(usize, usize)> {
    let mut start = 0usize;
    for line in text.split_inclusive('\n') {
        let end = start + line.len();
        if let Some(body) = line.strip_suffix('\n') {
            let body = body.strip_suffix('\r').unwrap_or(body);
            if body == DELIMITER {
                return Some((start, end));
            }
        }
        start = end;
    }
    None
}

pub fn extract_header_and_token(text: &str, labels: &HeaderLabels) -> HeaderedToken {
    let Some((header_end, token_start)) = find_delimiter(text) else {
        return HeaderedToken {
            header: BTreeMap::new(),
            token: text.trim().to_string(),
        };
    };

    let mut header = BTreeMap::new();
    for line in text[..header_end].lines() {
        let Some((label, value)) = line.split_once(": ") else {
            continue;
        };
        if let Some(field) = labels.field_for(label.trim()) {
            header.insert(field.to_string(), value.trim().to_string());
        }
    }

    HeaderedToken {
        header,
        token: text[token_start..].trim().to_string(),
    }
}

pub fn build_export_block(
    header: &BTreeMap<String, String>,
    token: &str,
    labels: &HeaderLabels,
) -> String {
    let mut out = String::new();
    if let Some(class_name) = header.get(FIELD_CLASS_NAME) {
        out.push_str(&format!("{}: {}\n", labels.class_label, class_name));
    }
    if let Some(date) = header.get(FIELD_DATE) {
        out.push_str(&format!("{}: {}\n", labels.date_label, date));
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(token);
    out
}

/// Compresses `payload` and wraps it in a header block.
pub fn export_report(
    payload: &Payload,
    header: &BTreeMap<String, String>,
    labels: &HeaderLabels,
    level: CompressionLevel,
) -> Result<(String, String), CodecError> {
    let token = codec::compressed::try_compress(payload, level)?;
    Ok((build_export_block(header, &token, labels), token))
}

pub fn decode_report(text: &str, labels: &HeaderLabels) -> Option<DecodedReport> {
    let HeaderedToken { header, token } = extract_header_and_token(text, labels);
    let (payload, format) = codec::decode_unknown_with_format(&token)?;
    Some(DecodedReport {
        header,
        payload,
        format,
    })
}

/// Copies header fields into `payload.metadata` as `headerClassName` and
/// `headerDate`. Non-object payloads are left alone.
pub fn annotate_metadata(payload: &mut Payload, header: &BTreeMap<String, String>) {
    if header.is_empty() {
        return;
    }
    let Some(root) = payload.as_object_mut() else {
        return;
    };
    let metadata = root
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(metadata) = metadata.as_object_mut() else {
        return;
    };
    if let Some(class_name) = header.get(FIELD_CLASS_NAME) {
        metadata.insert(
            "headerClassName".to_string(),
            Value::String(class_name.clone()),
        );
    }
    if let Some(date) = header.get(FIELD_DATE) {
        metadata.insert("headerDate".to_string(), Value::String(date.clone()));
    }
}
