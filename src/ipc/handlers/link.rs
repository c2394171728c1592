use classlinkd::codec::{self, legacy, TokenFormat};
use classlinkd::link;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{level_param, param_str, require_data, require_str};
use crate::ipc::types::{AppState, Request};

fn handle_link_build(state: &mut AppState, req: &Request) -> serde_json::Value {
    let data = match require_data(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let base = param_str(req, "baseUrl")
        .map(str::to_string)
        .or_else(|| state.config.export.share_base_url.clone());
    let Some(base) = base else {
        return err(
            &req.id,
            "bad_params",
            "missing params.baseUrl and no shareBaseUrl configured",
            None,
        );
    };

    // Share links have always carried the uncompressed format.
    let format = match param_str(req, "format").unwrap_or("legacy") {
        "legacy" => TokenFormat::Legacy,
        "compressed" => TokenFormat::Compressed,
        other => {
            return err(
                &req.id,
                "bad_params",
                format!("format must be legacy or compressed (got {})", other),
                None,
            )
        }
    };
    let encoded = match format {
        TokenFormat::Legacy => legacy::try_encode(data),
        TokenFormat::Compressed => {
            let level = match level_param(req, state.config.export.compression_level) {
                Ok(l) => l,
                Err(resp) => return resp,
            };
            codec::compressed::try_compress(data, level)
        }
    };
    let token = match encoded {
        Ok(t) => t,
        Err(e) => return err(&req.id, "codec_failed", e.to_string(), None),
    };

    let mut export_id = None;
    if let Some(store) = state.store.as_ref() {
        let class_name = data.get("className").and_then(|v| v.as_str());
        match store.record_export(&token, format, class_name) {
            Ok(record) => export_id = Some(record.id),
            Err(e) => tracing::warn!(error = %e, "failed to record export"),
        }
    }

    ok(
        &req.id,
        json!({
            "url": link::build_share_link(&base, &token),
            "token": token,
            "format": format,
            "exportId": export_id,
        }),
    )
}

fn handle_link_parse(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let url = match require_str(req, "url") {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let token = link::extract_data_param(url).unwrap_or_else(|| url.trim());
    match codec::decode_unknown_with_format(token) {
        Some((payload, format)) => ok(
            &req.id,
            json!({ "token": token, "payload": payload, "format": format }),
        ),
        None => err(
            &req.id,
            "decode_failed",
            "link does not carry a decodable token",
            None,
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "link.build" => Some(handle_link_build(state, req)),
        "link.parse" => Some(handle_link_parse(state, req)),
        _ => None,
    }
}
