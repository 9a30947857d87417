// SPDX-License-Identifier: GPL-3.0-only

//! Persistent storage for the code list
//!
//! The list lives in a small key-value store of serialized strings. The
//! value under [`LIST_KEY`](crate::constants::storage::LIST_KEY) is the JSON
//! array of codes and is overwritten wholesale on every mutation.
//!
//! Storage problems never reach the user: unreadable or malformed data loads
//! as an empty list, failed writes are logged and the in-memory list stays
//! authoritative for the running session.

use crate::constants::storage::LIST_KEY;
use crate::errors::StorageError;
use crate::list::CodeList;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Key-value persistence addressed by fixed string keys
pub trait KeyValueStore {
    /// Read the value stored under `key`
    ///
    /// Returns `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// JSON object file backed store
///
/// Each write rewrites the whole file through a temporary file and a rename,
/// so a crash never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serialized)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every later write
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Discarding unreadable store");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, like a disabled storage backend
    pub fn unavailable() -> Self {
        Self {
            entries: Mutex::default(),
            unavailable: true,
        }
    }

    /// Seed a raw value, bypassing serialization
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// The persisted code list
///
/// Owns the in-memory [`CodeList`] and writes it back after each mutation.
pub struct CodeListStore<S: KeyValueStore> {
    backend: S,
    list: CodeList,
}

impl<S: KeyValueStore> CodeListStore<S> {
    /// Load the list from `backend`, falling back to an empty list
    pub fn open(backend: S) -> Self {
        let list = match load_list(&backend) {
            Ok(list) => {
                info!(count = list.len(), "Loaded code list");
                list
            }
            Err(e) => {
                warn!(error = %e, "Code list unavailable, starting empty");
                CodeList::new()
            }
        };

        Self { backend, list }
    }

    /// Current list, in insertion order
    pub fn get(&self) -> &CodeList {
        &self.list
    }

    /// Replace the list and persist it synchronously
    ///
    /// Write failures are logged; the new list is kept in memory either way.
    pub fn set(&mut self, list: CodeList) {
        self.list = list;
        self.persist();
    }

    /// Append a code unless already present; persists on change
    pub fn append(&mut self, code: &str) -> bool {
        if !self.list.append(code) {
            debug!(code, "Code already in list");
            return false;
        }
        self.persist();
        true
    }

    /// Remove a code if present; persists on change
    pub fn remove(&mut self, code: &str) -> bool {
        if !self.list.remove(code) {
            debug!(code, "Code not in list, nothing to delete");
            return false;
        }
        self.persist();
        true
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.list)
            .map_err(StorageError::from)
            .and_then(|value| self.backend.set(LIST_KEY, &value));

        match result {
            Ok(()) => debug!(count = self.list.len(), "Persisted code list"),
            Err(e) => warn!(error = %e, "Failed to persist code list"),
        }
    }
}

fn load_list<S: KeyValueStore>(backend: &S) -> Result<CodeList, StorageError> {
    match backend.get(LIST_KEY)? {
        Some(value) => {
            let codes: Vec<String> = serde_json::from_str(&value)?;
            Ok(CodeList::from(codes))
        }
        None => Ok(CodeList::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_loads_empty() {
        let store = CodeListStore::open(MemoryStore::new());
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_malformed_value_loads_empty() {
        let backend = MemoryStore::new().with_entry(LIST_KEY, "{\"not\": \"a list\"}");
        let store = CodeListStore::open(backend);
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_unavailable_backend_loads_empty_and_keeps_working() {
        let mut store = CodeListStore::open(MemoryStore::unavailable());
        assert!(store.get().is_empty());
        assert!(store.append("9780306406157"));
        assert_eq!(store.get().len(), 1);
    }

    #[test]
    fn test_set_on_unavailable_backend_keeps_list_in_memory() {
        let mut store = CodeListStore::open(MemoryStore::unavailable());
        store.set(CodeList::from(vec!["B".to_string(), "A".to_string()]));
        assert_eq!(store.get().as_slice(), ["B", "A"]);
        assert!(store.backend().get(LIST_KEY).is_err());
    }

    #[test]
    fn test_mutations_are_persisted() {
        let mut store = CodeListStore::open(MemoryStore::new());
        store.append("A");
        store.append("B");
        store.remove("A");

        let raw = store.backend().get(LIST_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"["B"]"#);
    }

    #[test]
    fn test_duplicate_append_does_not_write() {
        let backend = MemoryStore::new().with_entry(LIST_KEY, r#"["A"]"#);
        let mut store = CodeListStore::open(backend);
        assert!(!store.append("A"));
        assert_eq!(store.backend().get(LIST_KEY).unwrap().unwrap(), r#"["A"]"#);
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let store = FileStore::new(&path);

        store.set("isbns", "[]").unwrap();
        assert_eq!(store.get("isbns").unwrap().as_deref(), Some("[]"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_replaces_corrupt_file_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = FileStore::new(&path);

        assert!(store.get("isbns").is_err());
        store.set("isbns", r#"["A"]"#).unwrap();
        assert_eq!(store.get("isbns").unwrap().as_deref(), Some(r#"["A"]"#));
    }
}
