use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};

use super::loader::load_file;
use super::model::CapexTable;

/// What makes two reads of a file "the same source".
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl SourceStamp {
    fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("reading metadata of {}", path.display()))?;
        Ok(SourceStamp {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Loaded tables keyed by canonical path. An entry is reused only while the
/// file's modification time and length are unchanged. Failed loads are not
/// stored.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, (SourceStamp, Arc<CapexTable>)>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it if absent or stale.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<CapexTable>> {
        let key = std::fs::canonicalize(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let stamp = SourceStamp::of(&key)?;

        if let Some((cached_stamp, table)) = self.entries.get(&key) {
            if *cached_stamp == stamp {
                log::debug!("Cache hit for {}", key.display());
                return Ok(Arc::clone(table));
            }
            log::debug!("Cache entry for {} is stale", key.display());
        }

        let table = Arc::new(load_file(&key)?);
        log::info!(
            "Loaded {} projects from {} (extra columns: {:?})",
            table.len(),
            key.display(),
            table.extra_columns
        );
        self.entries.insert(key, (stamp, Arc::clone(&table)));
        Ok(table)
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
