//! Locale-scoped storage of the catalog index.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::advisory::Advisory;
use crate::config::{EngineConfig, Locale};
use crate::index::Index;
use crate::store::atomic::{atomic_read_json, atomic_write_json, discard_file};
use crate::{CatalogError, Result};

/// How a load attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// A non-empty index was read.
    Loaded,
    /// No file at the storage location.
    Missing,
    /// The file decoded to an index with no entries.
    Empty,
    /// The file could not be decoded. `removed` tells whether it was deleted.
    Corrupt { removed: bool },
    /// The file exists but reading it failed (permissions and the like).
    Unreadable { message: String },
}

/// Result of [`IndexStore::load`].
#[derive(Debug)]
pub struct LoadOutcome {
    pub index: Index,
    pub status: LoadStatus,
}

impl LoadOutcome {
    fn empty(status: LoadStatus) -> Self {
        Self {
            index: Index::new(),
            status,
        }
    }

    /// The advisory a caller should see for this outcome, if any.
    pub fn advisory(&self, path: &Path) -> Option<Advisory> {
        let path = path.to_path_buf();
        match &self.status {
            LoadStatus::Loaded => None,
            LoadStatus::Missing | LoadStatus::Empty => Some(Advisory::IndexUnavailable { path }),
            LoadStatus::Corrupt { removed } => Some(Advisory::IndexCorrupt {
                path,
                removed: *removed,
            }),
            LoadStatus::Unreadable { message } => Some(Advisory::IndexUnreadable {
                path,
                message: message.clone(),
            }),
        }
    }
}

/// Owns the storage location for one locale.
///
/// Loading never fails: a missing file yields an empty index, and a file that
/// cannot be decoded is deleted so the next build starts clean.
#[derive(Debug, Clone)]
pub struct IndexStore {
    locale: Locale,
    path: PathBuf,
}

impl IndexStore {
    pub fn new(locale: Locale, path: impl Into<PathBuf>) -> Self {
        Self {
            locale,
            path: path.into(),
        }
    }

    /// Store for `locale` laid out according to `config`.
    pub fn for_locale(config: &EngineConfig, locale: Locale) -> Self {
        Self::new(locale, config.index_path(locale))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the index document.
    pub fn load(&self) -> LoadOutcome {
        debug!("Loading {} index from {}", self.locale, self.path.display());

        match atomic_read_json::<Index>(&self.path) {
            Ok(Some(index)) if index.is_empty() => LoadOutcome::empty(LoadStatus::Empty),
            Ok(Some(index)) => {
                debug!("Loaded {} entries", index.len());
                LoadOutcome {
                    index,
                    status: LoadStatus::Loaded,
                }
            }
            Ok(None) => LoadOutcome::empty(LoadStatus::Missing),
            Err(CatalogError::Json { message, .. }) => {
                warn!(
                    "Index {} can not be decoded and is removed: {}",
                    self.path.display(),
                    message
                );
                let removed = match discard_file(&self.path) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Failed to remove corrupt index: {}", e);
                        false
                    }
                };
                LoadOutcome::empty(LoadStatus::Corrupt { removed })
            }
            Err(e) => {
                warn!("Index {} can not be read: {}", self.path.display(), e);
                LoadOutcome::empty(LoadStatus::Unreadable {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Replace the stored index wholesale.
    ///
    /// This is the write side used by index builders; readers never observe a
    /// partially written document.
    pub fn replace(&self, index: &Index) -> Result<()> {
        debug!(
            "Writing {} entries to {}",
            index.len(),
            self.path.display()
        );
        atomic_write_json(&self.path, index)
    }

    /// Days since the index file was last modified, or -1 if there is none.
    pub fn age_in_days(&self) -> i64 {
        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(time) => time,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(
                        "Can not read modification time of {}: {}",
                        self.path.display(),
                        e
                    );
                }
                return -1;
            }
        };

        let modified: DateTime<Local> = modified.into();
        (Local::now() - modified).num_days().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> IndexStore {
        IndexStore::new(Locale::English, dir.path().join("catalog_index_en.json"))
    }

    fn sample_index() -> Index {
        vec![
            ("A1", vec!["Consumer Price Index", "MONTHLY", "2003-01"]),
            ("A2", vec!["Producer Price Index", "MONTHLY", "2005-01"]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let outcome = store.load();
        assert!(outcome.index.is_empty());
        assert_eq!(outcome.status, LoadStatus::Missing);
        assert!(matches!(
            outcome.advisory(store.path()),
            Some(Advisory::IndexUnavailable { .. })
        ));
    }

    #[test]
    fn test_replace_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.replace(&sample_index()).unwrap();
        let outcome = store.load();
        assert_eq!(outcome.status, LoadStatus::Loaded);
        assert_eq!(outcome.index, sample_index());
        assert!(outcome.advisory(store.path()).is_none());
    }

    #[test]
    fn test_corrupt_file_is_removed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "this is not json").unwrap();

        let outcome = store.load();
        assert!(outcome.index.is_empty());
        assert_eq!(outcome.status, LoadStatus::Corrupt { removed: true });
        assert!(!store.exists());

        // Second load sees a missing file.
        assert_eq!(store.load().status, LoadStatus::Missing);
    }

    #[test]
    fn test_wrong_shape_counts_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"A1": {"name": "Consumer"}}"#).unwrap();

        assert_eq!(store.load().status, LoadStatus::Corrupt { removed: true });
        assert!(!store.exists());
    }

    #[test]
    fn test_empty_document_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{}").unwrap();

        let outcome = store.load();
        assert_eq!(outcome.status, LoadStatus::Empty);
        assert!(store.exists());
    }

    #[test]
    fn test_age_in_days() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.age_in_days(), -1);

        store.replace(&sample_index()).unwrap();
        assert_eq!(store.age_in_days(), 0);
    }

    #[test]
    fn test_for_locale_uses_config_layout() {
        let config = EngineConfig::new("/data");
        let store = IndexStore::for_locale(&config, Locale::Turkish);
        assert_eq!(store.path(), Path::new("/data/catalog_index_tr.json"));
        assert_eq!(store.locale(), Locale::Turkish);
    }
}
