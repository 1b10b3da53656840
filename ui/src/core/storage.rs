//! Local persistence for small JSON documents such as the signed-in user.
//!
//! Browser builds use `localStorage`; native builds keep one JSON file per
//! key under the platform data directory. Callers treat every backend as
//! best-effort: a failed read is "nothing stored", a failed write is logged.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("persistent storage is not available here")]
    Unavailable,

    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("browser storage rejected the operation: {0}")]
    Browser(String),
}

/// String key/value persistence, the shape of `window.localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode `key`. Missing, unreadable and corrupt entries all come
/// back as `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(target: "kaizen::storage", %key, %err, "storage read failed");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(target: "kaizen::storage", %key, %err, "discarding corrupt stored value");
            None
        }
    }
}

pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// In-process storage; used by tests and as the fallback when nothing else works.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{KeyValueStore, StorageError};

    /// `window.localStorage`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserStorage;

    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(|err| StorageError::Browser(format!("{err:?}")))?
            .ok_or(StorageError::Unavailable)
    }

    impl KeyValueStore for BrowserStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            local_storage()?
                .get_item(key)
                .map_err(|err| StorageError::Browser(format!("{err:?}")))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            local_storage()?
                .set_item(key, value)
                .map_err(|err| StorageError::Browser(format!("{err:?}")))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            local_storage()?
                .remove_item(key)
                .map_err(|err| StorageError::Browser(format!("{err:?}")))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use files::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod files {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use directories::ProjectDirs;

    use super::{KeyValueStore, StorageError};

    /// One `<key>.json` file per key inside a directory.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        /// The per-user data directory, e.g. `~/.local/share/kaizen`.
        pub fn in_data_dir() -> Result<Self, StorageError> {
            let dirs = ProjectDirs::from("org", "Kaizen", "kaizen").ok_or(StorageError::Unavailable)?;
            Ok(Self::new(dirs.data_dir()))
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        pub(super) fn path_for(&self, key: &str) -> PathBuf {
            let safe: String = key
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            self.dir.join(format!("{safe}.json"))
        }
    }

    impl KeyValueStore for FileStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match std::fs::read_to_string(self.path_for(key)) {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(self.path_for(key), value)?;
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            match std::fs::remove_file(self.path_for(key)) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            }
        }
    }
}

/// The platform's persistent store, falling back to memory when none exists.
pub fn default_storage() -> Rc<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserStorage)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        match FileStorage::in_data_dir() {
            Ok(files) => Rc::new(files),
            Err(err) => {
                warn!(target: "kaizen::storage", %err, "no data directory; state will not persist");
                Rc::new(MemoryStorage::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
    }

    #[test]
    fn memory_round_trip_and_remove() {
        let store = MemoryStorage::new();
        save_json(&store, "prefs", &Prefs { theme: "dark".into() }).unwrap();
        assert_eq!(
            load_json::<Prefs>(&store, "prefs"),
            Some(Prefs {
                theme: "dark".into()
            })
        );
        store.remove("prefs").unwrap();
        assert!(!store.contains("prefs"));
        assert_eq!(load_json::<Prefs>(&store, "prefs"), None);
    }

    #[test]
    fn corrupt_json_reads_as_nothing() {
        let store = MemoryStorage::with_entry("prefs", "{theme: oops");
        assert_eq!(load_json::<Prefs>(&store, "prefs"), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_storage_uses_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::new(dir.path());

        assert_eq!(store.get("user").unwrap(), None);
        store.set("user", "{\"a\":1}").unwrap();
        assert!(dir.path().join("user.json").exists());
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{\"a\":1}"));

        store.remove("user").unwrap();
        store.remove("user").unwrap();
        assert_eq!(store.get("user").unwrap(), None);
        assert!(store.path_for("../escape").ends_with("___escape.json"));
    }
}
