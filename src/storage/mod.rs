pub mod file;
pub mod memory;

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised while writing to a key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A string-keyed store of string values, shaped like browser local storage.
///
/// Reads never fail: a missing or unreadable backing store reads as absent.
/// Writes do fail when the backing store cannot be read back first.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Handle shared by every repository. The app is single-threaded.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// Read and decode the JSON value under `key`.
///
/// Absent keys give `None`. Values that fail to parse are logged and also
/// give `None`, so callers fall back to their empty state.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring unparseable stored value");
            None
        }
    }
}

/// Encode `value` as JSON and overwrite `key` with it.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}
