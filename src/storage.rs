//! Single-slot persisted content.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::fs::ensure_parent_dir;

/// Key under which the user's text is stored.
pub const CONTENT_KEY: &str = "scrollTextContent";

/// Persisted home of the user's text.
pub trait ContentStore {
    /// Saved text, or `None` when nothing has been saved.
    fn load(&self) -> ReelResult<Option<String>>;
    /// Replace the saved text.
    fn save(&mut self, text: &str) -> ReelResult<()>;
}

/// Non-persistent store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    /// Store pre-filled with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            slot: Some(text.into()),
        }
    }
}

impl ContentStore for MemoryStore {
    fn load(&self) -> ReelResult<Option<String>> {
        Ok(self.slot.clone())
    }

    fn save(&mut self, text: &str) -> ReelResult<()> {
        self.slot = Some(text.to_string());
        Ok(())
    }
}

/// JSON object file mapping keys to strings; only [`CONTENT_KEY`] is used.
///
/// Other keys already in the file are preserved on save. A file that does not parse is
/// replaced.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by `path` (created on first save).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> ReelResult<BTreeMap<String, String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ReelError::storage(format!(
                    "read '{}': {e}",
                    self.path.display()
                )));
            }
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text)
            .map_err(|e| ReelError::serde(format!("parse '{}': {e}", self.path.display())))
    }
}

impl ContentStore for FileStore {
    fn load(&self) -> ReelResult<Option<String>> {
        Ok(self.read_map()?.remove(CONTENT_KEY))
    }

    #[tracing::instrument(skip(self, text), fields(path = %self.path.display(), len = text.len()))]
    fn save(&mut self, text: &str) -> ReelResult<()> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(ReelError::Serde(msg)) => {
                tracing::warn!(error = %msg, "store file unreadable; replacing it");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(CONTENT_KEY.to_string(), text.to_string());
        let json = serde_json::to_string_pretty(&map)
            .map_err(|e| ReelError::serde(format!("serialize store: {e}")))?;

        ensure_parent_dir(&self.path)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write store '{}'", self.path.display()))?;
        tracing::debug!("content saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/storage/storage.rs"]
mod tests;
