//! Shared settings document (`settings.json`).
//!
//! The document is shared by every installed extension and by tools outside
//! skm, so writes are always read-merge-write and only touch the caller's
//! keys. Top-level values an edit leaves alone are written back with their
//! original bytes. An advisory lock on a sibling `.lock` file serializes
//! concurrent skm processes for the duration of one cycle.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, SkmError};
use crate::utils::fs::ensure_dir;

/// Top-level JSON object of the settings file.
pub type SettingsMap = Map<String, Value>;

/// Key under which MCP launch entries live.
pub const MCP_SERVERS_KEY: &str = "mcpServers";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing or empty file is an empty object.
    pub fn read(&self) -> Result<SettingsMap> {
        Ok(self.load()?.values)
    }

    fn load(&self) -> Result<SettingsDocument> {
        if !self.path.exists() {
            return Ok(SettingsDocument::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(SettingsDocument::default());
        }
        let values = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(SkmError::Serialization(format!(
                    "{} is not a JSON object",
                    self.path.display()
                )));
            }
            Err(err) => {
                return Err(SkmError::Serialization(format!(
                    "parse {}: {err}",
                    self.path.display()
                )));
            }
        };
        let original = serde_json::from_str(&raw).map_err(|err| {
            SkmError::Serialization(format!("parse {}: {err}", self.path.display()))
        })?;
        Ok(SettingsDocument { values, original })
    }

    /// Apply `edit` to the current document under the lock. The file is only
    /// rewritten when `edit` returns true.
    pub fn update<F>(&self, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut SettingsMap) -> bool,
    {
        let _lock = self.lock()?;
        let mut document = self.load()?;
        if !edit(&mut document.values) {
            return Ok(false);
        }
        self.write(&document)?;
        Ok(true)
    }

    fn write(&self, document: &SettingsDocument) -> Result<()> {
        let dir = self
            .path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        ensure_dir(&dir)?;

        let payload = document.render()?;
        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        temp.write_all(payload.as_bytes())?;
        temp.persist(&self.path).map_err(|err| SkmError::Io(err.error))?;
        debug!(path = %self.path.display(), keys = document.values.len(), "wrote settings");
        Ok(())
    }

    fn lock(&self) -> Result<SettingsLock> {
        let mut lock_path = self.path.clone().into_os_string();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);
        if let Some(parent) = lock_path.parent() {
            ensure_dir(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        Ok(SettingsLock { file })
    }
}

/// Held for one read-modify-write cycle.
struct SettingsLock {
    file: File,
}

impl Drop for SettingsLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Parsed document plus the source text of each top-level value.
#[derive(Default)]
struct SettingsDocument {
    values: SettingsMap,
    original: HashMap<String, Box<RawValue>>,
}

impl SettingsDocument {
    /// Pretty-printed object in `values` order. A value equal to what was
    /// read keeps its source text.
    fn render(&self) -> Result<String> {
        if self.values.is_empty() {
            return Ok("{}\n".to_string());
        }
        let mut out = String::from("{\n");
        for (index, (key, value)) in self.values.iter().enumerate() {
            if index > 0 {
                out.push_str(",\n");
            }
            let text = match self.original.get(key) {
                Some(raw) if Self::unchanged(raw, value) => raw.get().to_string(),
                _ => serde_json::to_string_pretty(value)?.replace('\n', "\n  "),
            };
            out.push_str("  ");
            out.push_str(&serde_json::to_string(key)?);
            out.push_str(": ");
            out.push_str(&text);
        }
        out.push_str("\n}\n");
        Ok(out)
    }

    fn unchanged(raw: &RawValue, value: &Value) -> bool {
        serde_json::from_str::<Value>(raw.get()).is_ok_and(|original| &original == value)
    }
}

/// Run `edit` on the `mcpServers` object, creating it (or replacing a
/// non-object) in place.
pub fn edit_mcp_servers<R>(
    settings: &mut SettingsMap,
    edit: impl FnOnce(&mut SettingsMap) -> R,
) -> R {
    let slot = settings
        .entry(MCP_SERVERS_KEY.to_string())
        .or_insert(Value::Null);
    let mut servers = match slot.take() {
        Value::Object(map) => map,
        _ => SettingsMap::new(),
    };
    let result = edit(&mut servers);
    *slot = Value::Object(servers);
    result
}
