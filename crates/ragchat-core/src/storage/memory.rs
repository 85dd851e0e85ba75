//! In-memory `KvStore` used by the core test suites.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use ragchat_types::error::RepositoryError;

use super::kv_store::{KvOp, KvStore};

#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Raw stored value, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Make every subsequent write fail with `RepositoryError::Connection`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        Ok(())
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }

    async fn commit(&self, ops: Vec<KvOp>) -> Result<(), RepositoryError> {
        self.check_writable()?;
        let mut entries = self.entries.lock().unwrap();
        for op in ops {
            match op {
                KvOp::Set { key, value } => {
                    entries.insert(key, value);
                }
                KvOp::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
