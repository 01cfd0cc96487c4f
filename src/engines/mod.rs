pub mod memory;

pub use memory::MemoryStore;

use crate::{Result, Value};

/// Storage behind the HTTP adapter.
///
/// Every operation fails with
/// [`KvsError::NotInitializedOrInvalidKey`](crate::KvsError::NotInitializedOrInvalidKey)
/// when the engine is unusable or `key` is empty. Implementations are shared
/// between request handlers by cloning, so clones must see the same entries.
pub trait KvsEngine: Clone + Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` when it is absent.
    fn get(&self, key: String) -> Result<Option<Value>>;
    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: String, value: Value) -> Result<()>;
    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: String) -> Result<()>;
}
