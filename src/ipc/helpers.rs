use classlinkd::codec::CompressionLevel;
use classlinkd::report::{FIELD_CLASS_NAME, FIELD_DATE};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::ipc::error::err;
use crate::ipc::types::Request;

pub fn param_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

pub fn require_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, Value> {
    param_str(req, key)
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing params.{}", key), None))
}

/// `params.data` may be any JSON value, including `null`, but must be present.
pub fn require_data(req: &Request) -> Result<&Value, Value> {
    req.params
        .get("data")
        .ok_or_else(|| err(&req.id, "bad_params", "missing params.data", None))
}

pub fn level_param(req: &Request, default: CompressionLevel) -> Result<CompressionLevel, Value> {
    let raw = match req.params.get("level") {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return Err(err(
                &req.id,
                "bad_params",
                "level must be a string or integer",
                None,
            ))
        }
    };
    raw.parse()
        .map_err(|m: String| err(&req.id, "bad_params", m, None))
}

pub fn header_params(req: &Request) -> BTreeMap<String, String> {
    let mut header = BTreeMap::new();
    if let Some(class_name) = param_str(req, FIELD_CLASS_NAME) {
        header.insert(FIELD_CLASS_NAME.to_string(), class_name.trim().to_string());
    }
    if let Some(date) = param_str(req, FIELD_DATE) {
        header.insert(FIELD_DATE.to_string(), date.trim().to_string());
    }
    header
}
