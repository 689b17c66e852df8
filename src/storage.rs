use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
    sync::Arc,
};
use tokio::fs;

use crate::error::StorageError;

/// Key holding the bearer token issued at login.
pub const TOKEN_KEY: &str = "token";
/// Key holding the serialized `User` identity record.
pub const USER_KEY: &str = "user";
pub const THEME_KEY: &str = "theme";

// 1. ClientStorage Contract
/// ClientStorage
///
/// Durable key/value storage on the visitor's side, the equivalent of the
/// browser's local storage. The session store keeps the token and identity
/// record here; the theme store keeps the UI preference.
///
/// Implementations swap freely: `FileStorage` for the running shell,
/// `MemoryStorage` for tests.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// 2. The File-Backed Implementation
/// FileStorage
///
/// Keeps every key in a single JSON object on disk. Each write rewrites the
/// whole file; the async mutex serializes read-modify-write cycles.
pub struct FileStorage {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(json) if json.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl ClientStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

// 3. The In-Memory Implementation (For Tests)
/// MemoryStorage
///
/// Process-local storage. `new_failing` simulates a storage backend that
/// rejects every operation (quota exceeded, private browsing, ...).
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    should_fail: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            should_fail: true,
        }
    }

    /// Synchronous peek used by tests and diagnostics.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl ClientStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable);
        }
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable);
        }
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// StorageState
///
/// The shared handle type injected into the session and theme stores.
pub type StorageState = Arc<dyn ClientStorage>;
