use std::path::PathBuf;

use classlinkd::config::{Config, ExportSettings};
use classlinkd::store::SqliteStore;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    /// Export settings as derived from the environment at startup.
    pub base_export: ExportSettings,
    pub workspace: Option<PathBuf>,
    pub store: Option<SqliteStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            base_export: config.export.clone(),
            config,
            workspace: None,
            store: None,
        }
    }
}
