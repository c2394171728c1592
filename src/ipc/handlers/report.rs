use classlinkd::codec::TokenFormat;
use classlinkd::report::{self, FIELD_CLASS_NAME};
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{header_params, level_param, require_data, require_str};
use crate::ipc::types::{AppState, Request};

fn handle_extract_header(state: &mut AppState, req: &Request) -> serde_json::Value {
    let text = match require_str(req, "text") {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let parsed = report::extract_header_and_token(text, &state.config.export.labels);
    ok(
        &req.id,
        json!({ "header": parsed.header, "token": parsed.token }),
    )
}

fn handle_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let data = match require_data(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let level = match level_param(req, state.config.export.compression_level) {
        Ok(l) => l,
        Err(resp) => return resp,
    };
    let header = header_params(req);

    let (text, token) =
        match report::export_report(data, &header, &state.config.export.labels, level) {
            Ok(v) => v,
            Err(e) => return err(&req.id, "codec_failed", e.to_string(), None),
        };

    let mut export_id = None;
    if let Some(store) = state.store.as_ref() {
        let class_name = header.get(FIELD_CLASS_NAME).map(String::as_str);
        match store.record_export(&token, TokenFormat::Compressed, class_name) {
            Ok(record) => export_id = Some(record.id),
            Err(e) => tracing::warn!(error = %e, "failed to record export"),
        }
    }

    ok(
        &req.id,
        json!({ "text": text, "token": token, "exportId": export_id }),
    )
}

fn handle_decode(state: &mut AppState, req: &Request) -> serde_json::Value {
    let text = match require_str(req, "text") {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let annotate = req
        .params
        .get("annotate")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);

    let Some(mut decoded) = report::decode_report(text, &state.config.export.labels) else {
        return err(
            &req.id,
            "decode_failed",
            "text does not contain a decodable token",
            None,
        );
    };
    if annotate {
        report::annotate_metadata(&mut decoded.payload, &decoded.header);
    }
    ok(&req.id, json!(decoded))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "report.extractHeader" => Some(handle_extract_header(state, req)),
        "report.export" => Some(handle_export(state, req)),
        "report.decode" => Some(handle_decode(state, req)),
        _ => None,
    }
}
