use classlinkd::store::KeyValueStore;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{param_str, require_str};
use crate::ipc::types::{AppState, Request};

const MAX_EXPORTS_LIMIT: u64 = 500;

fn no_workspace(req: &Request) -> serde_json::Value {
    err(&req.id, "no_workspace", "select a workspace first", None)
}

fn handle_store_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return no_workspace(req);
    };
    let key = match require_str(req, "key") {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    match store.get_json(key) {
        Ok(value) => ok(&req.id, json!({ "key": key, "value": value })),
        Err(e) => err(&req.id, "store_failed", format!("{e:?}"), None),
    }
}

fn handle_store_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(req);
    };
    let key = match require_str(req, "key") {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    if key.trim().is_empty() {
        return err(&req.id, "bad_params", "key must not be empty", None);
    }
    let Some(value) = req.params.get("value") else {
        return err(&req.id, "bad_params", "missing params.value", None);
    };
    match store.set_json(key, value) {
        Ok(()) => ok(&req.id, json!({ "key": key })),
        Err(e) => err(&req.id, "store_failed", format!("{e:?}"), None),
    }
}

fn handle_store_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(req);
    };
    let key = match require_str(req, "key") {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    match store.remove(key) {
        Ok(removed) => ok(&req.id, json!({ "key": key, "removed": removed })),
        Err(e) => err(&req.id, "store_failed", format!("{e:?}"), None),
    }
}

fn handle_store_keys(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return no_workspace(req);
    };
    let prefix = param_str(req, "prefix").unwrap_or("");
    match store.keys(prefix) {
        Ok(keys) => ok(&req.id, json!({ "keys": keys })),
        Err(e) => err(&req.id, "store_failed", format!("{e:?}"), None),
    }
}

fn handle_exports_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return no_workspace(req);
    };
    let limit = match req.params.get("limit") {
        None | Some(serde_json::Value::Null) => 50,
        Some(v) => match v.as_u64() {
            Some(n) if (1..=MAX_EXPORTS_LIMIT).contains(&n) => n,
            _ => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("limit must be in 1..={}", MAX_EXPORTS_LIMIT),
                    None,
                )
            }
        },
    };
    match store.list_exports(limit as usize) {
        Ok(exports) => ok(&req.id, json!({ "exports": exports })),
        Err(e) => err(&req.id, "store_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "store.get" => Some(handle_store_get(state, req)),
        "store.set" => Some(handle_store_set(state, req)),
        "store.remove" => Some(handle_store_remove(state, req)),
        "store.keys" => Some(handle_store_keys(state, req)),
        "exports.list" => Some(handle_exports_list(state, req)),
        _ => None,
    }
}
