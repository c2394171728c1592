use classlinkd::codec::{self, legacy, CompressionLevel};
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{level_param, require_data, require_str};
use crate::ipc::types::{AppState, Request};

fn handle_compress(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let data = match require_data(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let level = match level_param(req, CompressionLevel::Default) {
        Ok(l) => l,
        Err(resp) => return resp,
    };
    match codec::compressed::try_compress(data, level) {
        Ok(token) => ok(&req.id, json!({ "token": token })),
        Err(e) => err(&req.id, "codec_failed", e.to_string(), None),
    }
}

fn handle_decompress(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let token = req.params.get("token").unwrap_or(&serde_json::Value::Null);
    ok(&req.id, json!({ "payload": codec::decompress_value(token) }))
}

fn handle_legacy_encode(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let data = match require_data(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match legacy::try_encode(data) {
        Ok(token) => ok(&req.id, json!({ "token": token })),
        Err(e) => err(&req.id, "codec_failed", e.to_string(), None),
    }
}

fn handle_legacy_decode(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let token = match require_str(req, "token") {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "payload": legacy::decode(token) }))
}

fn handle_decode_unknown(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let token = match require_str(req, "token") {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    match codec::decode_unknown_with_format(token) {
        Some((payload, format)) => ok(&req.id, json!({ "payload": payload, "format": format })),
        None => ok(&req.id, json!({ "payload": null, "format": null })),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "codec.compress" => Some(handle_compress(state, req)),
        "codec.decompress" => Some(handle_decompress(state, req)),
        "codec.legacyEncode" => Some(handle_legacy_encode(state, req)),
        "codec.legacyDecode" => Some(handle_legacy_decode(state, req)),
        "codec.decodeUnknown" => Some(handle_decode_unknown(state, req)),
        _ => None,
    }
}
