use classlinkd::config::ExportSettings;
use classlinkd::store::{KeyValueStore, SqliteStore};
use serde_json::json;
use std::path::PathBuf;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

pub const SETTINGS_KEY: &str = "settings.export";

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match SqliteStore::open(&path) {
        Ok(store) => {
            // Persisted export settings override the environment. A bad stored
            // value must not prevent the workspace from opening.
            state.config.export = state.base_export.clone();
            match store.get_json(SETTINGS_KEY) {
                Ok(Some(v)) => match serde_json::from_value::<ExportSettings>(v) {
                    Ok(settings) => state.config.export = settings,
                    Err(e) => tracing::warn!(error = %e, "ignoring stored export settings"),
                },
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "failed to read stored export settings"),
            }

            tracing::info!(workspace = %path.to_string_lossy(), "workspace selected");
            state.workspace = Some(path.clone());
            state.store = Some(store);
            ok(&req.id, json!({ "workspacePath": path.to_string_lossy() }))
        }
        Err(e) => err(&req.id, "store_open_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
