use crate::{KvsEngine, KvsError, Result, Value};
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory engine backed by a sharded concurrent map.
///
/// Cloning is cheap and every clone shares the same entries.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    kv: Arc<DashMap<String, Value>>,
    initialized: bool,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            kv: Arc::new(DashMap::new()),
            initialized: true,
        }
    }

    /// A store that rejects every operation, as a misconfigured store would.
    pub fn uninitialized() -> MemoryStore {
        MemoryStore {
            kv: Arc::new(DashMap::new()),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.kv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kv.is_empty()
    }

    fn check(&self, key: &str) -> Result<()> {
        if !self.initialized || key.is_empty() {
            return Err(KvsError::NotInitializedOrInvalidKey);
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> MemoryStore {
        MemoryStore::new()
    }
}

impl KvsEngine for MemoryStore {
    fn get(&self, key: String) -> Result<Option<Value>> {
        self.check(&key)?;
        Ok(self.kv.get(&key).map(|v| v.value().clone()))
    }

    fn set(&self, key: String, value: Value) -> Result<()> {
        self.check(&key)?;
        self.kv.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: String) -> Result<()> {
        self.check(&key)?;
        self.kv.remove(&key);
        Ok(())
    }
}
