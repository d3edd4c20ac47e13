use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{KeyValueStore, StorageResult};

pub const STORAGE_FILE: &str = "storage.json";

// Values are kept as JSON so an entry this store did not write survives a rewrite.
type Entries = BTreeMap<String, Value>;

/// Key-value store backed by a single JSON object on disk.
///
/// The file is the source of truth: every read goes back to disk and every
/// write rewrites the whole document through a temp file and a rename, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store rooted at `<dir>/storage.json`. The directory is created on first write.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw document text. A missing or blank file is `None`.
    fn read_raw(&self) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn read_entries(&self) -> StorageResult<Entries> {
        let Some(content) = self.read_raw()? else {
            return Ok(Entries::new());
        };
        Ok(serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), error = %err, "storage file is corrupt");
            Entries::new()
        }))
    }

    /// Entries to rewrite. An unparseable document is copied to
    /// `storage.json.corrupt` first so the next write does not lose it.
    fn entries_for_update(&self) -> StorageResult<Entries> {
        let Some(content) = self.read_raw()? else {
            return Ok(Entries::new());
        };
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                let backup = self.corrupt_path();
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %err,
                    "storage file is corrupt, keeping a copy"
                );
                std::fs::copy(&self.path, &backup)?;
                Ok(Entries::new())
            }
        }
    }

    fn corrupt_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    fn write_entries(&self, entries: &Entries) -> StorageResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::trace!(path = %self.path.display(), keys = entries.len(), "storage written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cannot read storage file");
                return None;
            }
        };
        match entries.remove(key)? {
            Value::String(value) => Some(value),
            other => Some(other.to_string()),
        }
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), Value::String(value));
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries_for_update()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.get("userEmail"), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn set_creates_directory_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::in_dir(&nested);

        store.set("userEmail", "ada@example.com".to_string()).unwrap();
        store.set("multiDayNotes", "{}".to_string()).unwrap();

        let reopened = FileStore::in_dir(&nested);
        assert_eq!(reopened.get("userEmail").as_deref(), Some("ada@example.com"));
        assert_eq!(reopened.get("multiDayNotes").as_deref(), Some("{}"));
    }

    #[test]
    fn remove_deletes_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();

        store.remove("a").unwrap();

        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn corrupt_file_is_kept_aside_before_replacing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.get("a"), None);

        store.set("a", "1".to_string()).unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("storage.json.corrupt")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn non_string_value_does_not_cost_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(
            store.path(),
            r#"{"userEmail":"ada@example.com","todos_ada@example.com":"[]","extra":1}"#,
        )
        .unwrap();

        store.set("multiDayNotes", "{}".to_string()).unwrap();

        assert_eq!(store.get("userEmail").as_deref(), Some("ada@example.com"));
        assert_eq!(store.get("todos_ada@example.com").as_deref(), Some("[]"));
        assert_eq!(store.get("extra").as_deref(), Some("1"));
        assert_eq!(store.get("multiDayNotes").as_deref(), Some("{}"));
    }

    #[test]
    fn unreadable_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        // A directory in place of the document makes every read fail.
        std::fs::create_dir(store.path()).unwrap();

        assert_eq!(store.get("a"), None);
        assert!(matches!(
            store.set("a", "1".to_string()),
            Err(crate::storage::StorageError::Io(_))
        ));
        assert!(store.path().is_dir());
    }
}
