//! Sidecar configuration from environment variables.
//!
//! - `CLASSLINK_LOG` or `RUST_LOG`: tracing filter (default: info)
//! - `CLASSLINK_LOG_JSON`: emit JSON log lines (default: false)
//! - `CLASSLINK_COMPRESSION_LEVEL`: fast, default, best or 0-9 (default: best)
//! - `CLASSLINK_CLASS_LABEL` / `CLASSLINK_DATE_LABEL`: report header labels
//! - `CLASSLINK_SHARE_URL`: base URL for generated share links

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::codec::CompressionLevel;
use crate::report::HeaderLabels;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_filter: String,
    pub json_logs: bool,
    pub export: ExportSettings,
}

/// The part of the configuration a workspace may override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub compression_level: CompressionLevel,
    #[serde(flatten)]
    pub labels: HeaderLabels,
    pub share_base_url: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            // Report exports have always used maximum compression.
            compression_level: CompressionLevel::Best,
            labels: HeaderLabels::default(),
            share_base_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            json_logs: false,
            export: ExportSettings::default(),
        }
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid(key, "must be a boolean")),
    }
}

fn non_empty_label(key: &str, raw: String) -> Result<String, ConfigError> {
    let label = raw.trim().to_string();
    if label.is_empty() {
        return Err(ConfigError::invalid(key, "label must not be empty"));
    }
    if label.contains(": ") || label.contains('\n') {
        return Err(ConfigError::invalid(key, "label must not contain \": \" or newlines"));
    }
    Ok(label)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Config::default();

        if let Some(filter) = lookup("CLASSLINK_LOG").or_else(|| lookup("RUST_LOG")) {
            if !filter.trim().is_empty() {
                cfg.log_filter = filter.trim().to_string();
            }
        }
        if let Some(raw) = lookup("CLASSLINK_LOG_JSON") {
            cfg.json_logs = parse_bool("CLASSLINK_LOG_JSON", &raw)?;
        }
        if let Some(raw) = lookup("CLASSLINK_COMPRESSION_LEVEL") {
            cfg.export.compression_level = raw
                .parse()
                .map_err(|m: String| ConfigError::invalid("CLASSLINK_COMPRESSION_LEVEL", m))?;
        }
        if let Some(raw) = lookup("CLASSLINK_CLASS_LABEL") {
            cfg.export.labels.class_label = non_empty_label("CLASSLINK_CLASS_LABEL", raw)?;
        }
        if let Some(raw) = lookup("CLASSLINK_DATE_LABEL") {
            cfg.export.labels.date_label = non_empty_label("CLASSLINK_DATE_LABEL", raw)?;
        }
        if let Some(raw) = lookup("CLASSLINK_SHARE_URL") {
            let url = raw.trim();
            if !url.is_empty() {
                cfg.export.share_base_url = Some(url.to_string());
            }
        }
        Ok(cfg)
    }
}

impl ExportSettings {
    /// Applies a camelCase patch object. Unknown fields are rejected and
    /// nothing is changed when any field is invalid.
    pub fn apply_patch(&mut self, patch: &Map<String, Value>) -> Result<(), ConfigError> {
        let mut next = self.clone();
        for (k, v) in patch {
            match k.as_str() {
                "compressionLevel" => {
                    let raw = match v {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => n.to_string(),
                        _ => return Err(ConfigError::invalid(k, "must be a string or integer")),
                    };
                    next.compression_level = raw
                        .parse()
                        .map_err(|m: String| ConfigError::invalid(k, m))?;
                }
                "classLabel" | "dateLabel" => {
                    let s = v
                        .as_str()
                        .ok_or_else(|| ConfigError::invalid(k, "must be a string"))?;
                    let label = non_empty_label(k, s.to_string())?;
                    if k == "classLabel" {
                        next.labels.class_label = label;
                    } else {
                        next.labels.date_label = label;
                    }
                }
                "shareBaseUrl" => {
                    next.share_base_url = match v {
                        Value::Null => None,
                        Value::String(s) if s.trim().is_empty() => None,
                        Value::String(s) => Some(s.trim().to_string()),
                        _ => return Err(ConfigError::invalid(k, "must be a string or null")),
                    };
                }
                _ => return Err(ConfigError::invalid(k, "unknown export setting")),
            }
        }
        if next.labels.class_label == next.labels.date_label {
            return Err(ConfigError::invalid(
                "dateLabel",
                "class and date labels must differ",
            ));
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = Config::from_lookup(lookup(&[])).expect("config");
        assert_eq!(cfg.log_filter, "info");
        assert!(!cfg.json_logs);
        assert_eq!(cfg.export, ExportSettings::default());
        assert_eq!(cfg.export.labels.class_label, "فصل");
    }

    #[test]
    fn environment_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("RUST_LOG", "warn"),
            ("CLASSLINK_LOG", "classlinkd=debug"),
            ("CLASSLINK_LOG_JSON", "true"),
            ("CLASSLINK_COMPRESSION_LEVEL", "6"),
            ("CLASSLINK_CLASS_LABEL", "Class"),
            ("CLASSLINK_DATE_LABEL", "Date"),
            ("CLASSLINK_SHARE_URL", "https://example.test/weekly"),
        ]))
        .expect("config");
        assert_eq!(cfg.log_filter, "classlinkd=debug");
        assert!(cfg.json_logs);
        assert_eq!(cfg.export.compression_level, CompressionLevel::Precise(6));
        assert_eq!(cfg.export.labels.class_label, "Class");
        assert_eq!(
            cfg.export.share_base_url.as_deref(),
            Some("https://example.test/weekly")
        );
    }

    #[test]
    fn bad_level_is_reported_with_key() {
        let err = Config::from_lookup(lookup(&[("CLASSLINK_COMPRESSION_LEVEL", "11")]))
            .expect_err("invalid");
        assert!(err.to_string().starts_with("CLASSLINK_COMPRESSION_LEVEL:"));
    }

    #[test]
    fn patch_is_all_or_nothing() {
        let mut settings = ExportSettings::default();
        let patch = json!({ "compressionLevel": "fast", "classLabel": 5 });
        assert!(settings
            .apply_patch(patch.as_object().expect("object"))
            .is_err());
        assert_eq!(settings, ExportSettings::default());

        let patch = json!({ "compressionLevel": 1, "classLabel": "Class", "shareBaseUrl": null });
        settings
            .apply_patch(patch.as_object().expect("object"))
            .expect("apply");
        assert_eq!(settings.compression_level, CompressionLevel::Precise(1));
        assert_eq!(settings.labels.class_label, "Class");
    }

    #[test]
    fn settings_serialize_flat() {
        let v = serde_json::to_value(ExportSettings::default()).expect("serialize");
        assert_eq!(v["compressionLevel"], json!("best"));
        assert_eq!(v["classLabel"], json!("فصل"));
        assert_eq!(v["dateLabel"], json!("التاريخ"));
        assert_eq!(v["shareBaseUrl"], json!(null));
    }
}
