//! Atomic file operations for the JSON index document.
//!
//! Writes go to a temp file with a PID+TID suffix, are fsynced, and then
//! renamed over the target, so readers only ever see a complete document.

use crate::{CatalogError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process;
use std::thread;
use tracing::debug;

/// Read and parse a JSON file.
///
/// Returns `None` if the file doesn't exist. Undecodable content (invalid
/// UTF-8, malformed JSON, wrong shape) is reported as [`CatalogError::Json`];
/// every other failure is [`CatalogError::Io`].
pub fn atomic_read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CatalogError::Io {
                message: format!("Failed to open {}", path.display()),
                path: Some(path.to_path_buf()),
                source: Some(e),
            })
        }
    };

    let mut contents = String::new();
    if let Err(e) = file.read_to_string(&mut contents) {
        if e.kind() == ErrorKind::InvalidData {
            return Err(CatalogError::Json {
                message: format!("{} is not valid UTF-8", path.display()),
                source: None,
            });
        }
        return Err(CatalogError::Io {
            message: format!("Failed to read {}", path.display()),
            path: Some(path.to_path_buf()),
            source: Some(e),
        });
    }

    let data: T = serde_json::from_str(&contents).map_err(|e| CatalogError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })?;

    Ok(Some(data))
}

/// Write data to a JSON file atomically.
///
/// This function:
/// 1. Serializes data to a temp file with PID+TID suffix
/// 2. Calls fsync to ensure data reaches disk
/// 3. Atomically renames temp file to target
pub fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| CatalogError::Io {
                message: format!("Failed to create directory {}", parent.display()),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }
    }

    let temp_path = path.with_extension(format!("json.{}.{}.tmp", process::id(), thread_id()));

    // Compact output: the index is tens of thousands of entries.
    let serialized = serde_json::to_string(data).map_err(|e| CatalogError::Json {
        message: format!("Failed to serialize data: {}", e),
        source: Some(e),
    })?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| CatalogError::Io {
                message: format!("Failed to create temp file {}", temp_path.display()),
                path: Some(temp_path.clone()),
                source: Some(e),
            })?;

        file.write_all(serialized.as_bytes())
            .and_then(|_| file.flush())
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                let _ = fs::remove_file(&temp_path);
                CatalogError::Io {
                    message: format!("Failed to write temp file {}", temp_path.display()),
                    path: Some(temp_path.clone()),
                    source: Some(e),
                }
            })?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CatalogError::Io {
            message: format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            ),
            path: Some(path.to_path_buf()),
            source: Some(e),
        }
    })?;

    debug!("Atomically wrote {}", path.display());
    Ok(())
}

/// Remove a file, treating "already gone" as success.
pub fn discard_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CatalogError::io_with_path(e, path)),
    }
}

/// Get a unique thread identifier.
fn thread_id() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    thread::current().id().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    type Doc = BTreeMap<String, Vec<String>>;

    fn sample(name: &str) -> Doc {
        let mut doc = Doc::new();
        doc.insert("A1".to_string(), vec![name.to_string(), "MONTHLY".to_string()]);
        doc
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");

        atomic_write_json(&path, &sample("Consumer Price Index")).unwrap();
        assert!(path.exists());

        let read: Option<Doc> = atomic_read_json(&path).unwrap();
        assert_eq!(read, Some(sample("Consumer Price Index")));
    }

    #[test]
    fn test_atomic_write_replaces_previous_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");

        atomic_write_json(&path, &sample("first")).unwrap();
        atomic_write_json(&path, &sample("second")).unwrap();

        let current: Option<Doc> = atomic_read_json(&path).unwrap();
        assert_eq!(current, Some(sample("second")));
        assert!(!path.with_extension("json.bak").exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        atomic_write_json(&path, &sample("x")).unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["index.json".to_string()]);
    }

    #[test]
    fn test_atomic_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let result: Option<Doc> = atomic_read_json(&path).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_atomic_read_malformed_is_json_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        fs::write(&path, "{\"A1\": [\"unterminated").unwrap();

        let err = atomic_read_json::<Doc>(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Json { .. }));
    }

    #[test]
    fn test_atomic_read_invalid_utf8_is_json_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        fs::write(&path, [0x7b, 0xff, 0xfe, 0x7d]).unwrap();

        let err = atomic_read_json::<Doc>(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Json { .. }));
    }

    #[test]
    fn test_atomic_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("index.json");

        atomic_write_json(&path, &sample("nested")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_discard_file_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        fs::write(&path, "{}").unwrap();

        discard_file(&path).unwrap();
        assert!(!path.exists());
        discard_file(&path).unwrap();
    }
}
