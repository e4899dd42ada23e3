//! Key-value string storage and the persisted cart format.
//!
//! The cart is stored as the JSON array of its items. A blob that fails to
//! parse is treated as "no saved build".

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::cart::Cart;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage lock error: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object file, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Serialize a cart to its persisted JSON form.
pub fn cart_to_json(cart: &Cart) -> Result<String> {
    Ok(serde_json::to_string(cart)?)
}

/// Parse a persisted cart. Anything unparseable yields an empty cart.
pub fn cart_from_json(blob: &str) -> Cart {
    match serde_json::from_str(blob) {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!("Ignoring malformed saved build: {}", e);
            Cart::new()
        }
    }
}

pub fn save_cart<S: KeyValueStore + ?Sized>(store: &S, key: &str, cart: &Cart) -> Result<()> {
    store.set(key, &cart_to_json(cart)?)
}

/// Load the saved cart under `key`; a missing, unreadable or malformed entry is an empty cart.
pub fn load_cart<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Cart {
    match store.get(key) {
        Ok(Some(blob)) => cart_from_json(&blob),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!("Could not read saved build '{}': {}", key, e);
            Cart::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{keys, Category, Product};

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(Product::new("case", "Lancool", Category::Case, 90).with_spec(keys::MAX_GPU_LENGTH, "384mm"), 1);
        cart.add(Product::new("ram", "Kit 16GB x2", Category::Ram, 70), 2);
        cart.add(Product::new("cpu", "Ryzen 5", Category::Cpu, 200).with_spec(keys::TDP, "65W"), 1);
        cart
    }

    #[test]
    fn test_round_trip_through_memory_store() {
        let store = MemoryStore::new();
        let cart = sample_cart();

        save_cart(&store, "build", &cart).unwrap();
        let restored = load_cart(&store, "build");

        assert_eq!(restored, cart);
        let order: Vec<_> = restored.items().iter().map(|i| (i.id().to_string(), i.quantity)).collect();
        assert_eq!(
            order,
            vec![("case".to_string(), 1), ("ram".to_string(), 2), ("cpu".to_string(), 1)]
        );
    }

    #[test]
    fn test_malformed_blob_is_empty_cart() {
        let store = MemoryStore::new();
        store.set("build", "{not json").unwrap();
        assert!(load_cart(&store, "build").is_empty());

        store.set("build", r#"[{"id": "x"}]"#).unwrap();
        assert!(load_cart(&store, "build").is_empty());
    }

    #[test]
    fn test_missing_key_is_empty_cart() {
        assert!(load_cart(&MemoryStore::new(), "nothing").is_empty());
    }

    #[test]
    fn test_persisted_shape_is_flat() {
        let json = cart_to_json(&sample_cart()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["id"], "case");
        assert_eq!(first["quantity"], 1);
        assert_eq!(first["specDetails"]["maxGpuLength"], "384mm");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::new(&path);

        save_cart(&store, "build", &sample_cart()).unwrap();
        store.set("other", "value").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(load_cart(&reopened, "build"), sample_cart());
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));

        reopened.remove("other").unwrap();
        assert!(reopened.get("other").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_store_fails_open_for_cart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "garbage").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("build").is_err());
        assert!(load_cart(&store, "build").is_empty());
    }
}
