use classlinkd::store::KeyValueStore;

use crate::ipc::error::{err, ok};
use crate::ipc::handlers::core::SETTINGS_KEY;
use crate::ipc::types::{AppState, Request};

fn settings_json(state: &AppState) -> serde_json::Value {
    serde_json::to_value(&state.config.export).unwrap_or(serde_json::Value::Null)
}

fn handle_settings_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, settings_json(state))
}

fn handle_settings_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(patch) = req.params.get("patch").and_then(|v| v.as_object()) else {
        return err(&req.id, "bad_params", "patch must be an object", None);
    };

    let mut next = state.config.export.clone();
    if let Err(e) = next.apply_patch(patch) {
        return err(&req.id, "bad_params", e.to_string(), None);
    }

    let persisted = match state.store.as_mut() {
        Some(store) => {
            let value = match serde_json::to_value(&next) {
                Ok(v) => v,
                Err(e) => return err(&req.id, "store_failed", e.to_string(), None),
            };
            if let Err(e) = store.set_json(SETTINGS_KEY, &value) {
                return err(&req.id, "store_failed", format!("{e:?}"), None);
            }
            true
        }
        None => false,
    };

    state.config.export = next;
    let mut result = settings_json(state);
    result["persisted"] = serde_json::Value::Bool(persisted);
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "settings.get" => Some(handle_settings_get(state, req)),
        "settings.update" => Some(handle_settings_update(state, req)),
        _ => None,
    }
}
