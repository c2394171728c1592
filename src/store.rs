//! Key-value persistence for the sidecar.
//!
//! The codec itself never touches storage. The sidecar gets a store injected
//! when a workspace is selected and loads/saves through this trait only.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::codec::TokenFormat;

pub const DB_FILE: &str = "classlink.sqlite3";

pub trait KeyValueStore {
    fn get_json(&self, key: &str) -> anyhow::Result<Option<Value>>;
    fn set_json(&mut self, key: &str, value: &Value) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<bool>;
    fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_json(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_json(&mut self, key: &str, value: &Value) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub id: String,
    pub format: TokenFormat,
    pub fingerprint: String,
    pub token_len: usize,
    pub class_name: Option<String>,
    pub created_at: String,
}

pub fn token_fingerprint(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn format_key(format: TokenFormat) -> &'static str {
    match format {
        TokenFormat::Compressed => "compressed",
        TokenFormat::Legacy => "legacy",
    }
}

fn parse_format(s: &str) -> anyhow::Result<TokenFormat> {
    match s {
        "compressed" => Ok(TokenFormat::Compressed),
        "legacy" => Ok(TokenFormat::Legacy),
        other => Err(anyhow!("unknown token format in export history: {}", other)),
    }
}

pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(workspace).with_context(|| {
            format!(
                "failed to create workspace {}",
                workspace.to_string_lossy()
            )
        })?;
        let db_path = workspace.join(DB_FILE);
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open store {}", db_path.to_string_lossy()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn,
            path: Some(db_path),
        })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory store")?;
        init_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record_export(
        &self,
        token: &str,
        format: TokenFormat,
        class_name: Option<&str>,
    ) -> anyhow::Result<ExportRecord> {
        let record = ExportRecord {
            id: Uuid::new_v4().to_string(),
            format,
            fingerprint: token_fingerprint(token),
            token_len: token.len(),
            class_name: class_name.map(str::to_string),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.conn
            .execute(
                "INSERT INTO exports(id, format, fingerprint, token_len, class_name, created_at)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    format_key(record.format),
                    record.fingerprint,
                    record.token_len as i64,
                    record.class_name,
                    record.created_at,
                ],
            )
            .context("failed to record export")?;
        Ok(record)
    }

    /// Newest first.
    pub fn list_exports(&self, limit: usize) -> anyhow::Result<Vec<ExportRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, format, fingerprint, token_len, class_name, created_at
             FROM exports
             ORDER BY seq DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, format, fingerprint, token_len, class_name, created_at) = row?;
            out.push(ExportRecord {
                id,
                format: parse_format(&format)?,
                fingerprint,
                token_len: token_len.max(0) as usize,
                class_name,
                created_at,
            });
        }
        Ok(out)
    }
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS exports(
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            format TEXT NOT NULL,
            fingerprint TEXT NOT NULL,
            token_len INTEGER NOT NULL,
            class_name TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get_json(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |r| r.get(0))
            .optional()?;
        match raw {
            Some(text) => Ok(Some(
                serde_json::from_str(&text)
                    .with_context(|| format!("stored value for {} is not JSON", key))?,
            )),
            None => Ok(None),
        }
    }

    fn set_json(&mut self, key: &str, value: &Value) -> anyhow::Result<()> {
        let text = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO kv(key, value, updated_at) VALUES(?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, text, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<bool> {
        let n = self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(n > 0)
    }

    fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key")?;
        let rows = stmt.query_map([prefix], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
