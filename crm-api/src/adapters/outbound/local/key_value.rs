//! `KeyValueStore` implementations backing the local store.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use serde_json::Value;

use crate::domain::ports::outbound::{KeyValueStore, StorageError};

/// Process-local map. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// One pretty-printed JSON file per key under `dir`.
pub struct JsonFileKeyValueStore {
    dir: PathBuf,
}

impl JsonFileKeyValueStore {
    /// Creates `dir` if it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let data = match fs::read_to_string(self.path(key)) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&value)?;

        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_get_set_remove() {
        let store = MemoryKeyValueStore::default();
        assert!(store.get("crm:clients").unwrap().is_none());

        store.set("crm:clients", json!([{"id": "c1"}])).unwrap();
        assert_eq!(store.get("crm:clients").unwrap(), Some(json!([{"id": "c1"}])));

        store.remove("crm:clients").unwrap();
        assert!(store.get("crm:clients").unwrap().is_none());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        JsonFileKeyValueStore::open(dir.path())
            .unwrap()
            .set("crm:leads", json!([{"id": "l1"}]))
            .unwrap();

        let reopened = JsonFileKeyValueStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("crm:leads").unwrap(), Some(json!([{"id": "l1"}])));
        assert!(dir.path().join("crm_leads.json").exists());
        assert!(!dir.path().join("crm_leads.json.tmp").exists());
    }

    #[test]
    fn file_store_remove_of_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileKeyValueStore::open(dir.path()).unwrap();
        store.remove("crm:nothing").unwrap();
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileKeyValueStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("crm_tasks.json"), "{not json").unwrap();

        assert!(matches!(
            store.get("crm:tasks"),
            Err(StorageError::Serialization(_))
        ));
    }
}
