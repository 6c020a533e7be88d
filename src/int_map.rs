//! IntHashMap: the `u64` keyspace.

use crate::config::MapConfig;
use crate::error::Result;
use crate::lock::{Locked, Locking, Unlocked};
use crate::map::Map;
use crate::value::Value;

/// Map from `u64` keys to `Value`s. Keys are stored inline in the slot;
/// every `u64`, including 0 and `u64::MAX`, is a valid key.
#[derive(Debug)]
pub struct IntHashMap<L: Locking = Unlocked> {
    inner: Map<u64, L>,
}

pub type SyncIntHashMap = IntHashMap<Locked>;

impl IntHashMap {
    pub fn new() -> Self {
        Self {
            inner: Map::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Map::with_capacity(capacity),
        }
    }
}

impl Default for IntHashMap {
    fn default() -> Self {
        Self::new()
    }
}

impl IntHashMap<Locked> {
    pub fn new_threadsafe() -> Self {
        Self {
            inner: Map::new_threadsafe(),
        }
    }

    pub fn with_capacity_threadsafe(capacity: usize) -> Self {
        Self {
            inner: Map::with_capacity_threadsafe(capacity),
        }
    }
}

impl<L: Locking> IntHashMap<L> {
    pub fn with_config(config: MapConfig) -> Self {
        Self {
            inner: Map::with_config(config),
        }
    }

    pub fn try_with_config(config: MapConfig) -> Result<Self> {
        Ok(Self {
            inner: Map::try_with_config(config)?,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn put(&self, key: u64, value: Value) -> Result<Option<Value>> {
        self.inner.put(&key, value)
    }

    pub fn get(&self, key: u64) -> Value {
        self.inner.get(&key)
    }

    pub fn lookup(&self, key: u64) -> Option<Value> {
        self.inner.lookup(&key)
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.inner.contains_key(&key)
    }

    pub fn delete(&self, key: u64) -> Value {
        self.inner.delete(&key)
    }

    pub fn remove(&self, key: u64) -> Option<Value> {
        self.inner.remove(&key)
    }

    pub fn resize(&self, capacity: usize) -> Result<()> {
        self.inner.resize(capacity)
    }

    pub fn clear(&self) {
        self.inner.clear()
    }

    pub fn next(&self, cursor: &mut usize) -> Option<(u64, Value)> {
        self.inner.next(cursor)
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(u64, Value),
    {
        self.inner.for_each(|k, v| f(*k, v))
    }

    pub fn free_with<F>(self, destructor: F)
    where
        F: FnMut(Value),
    {
        self.inner.free_with(destructor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extreme_keys_are_ordinary() {
        let m = IntHashMap::new();
        m.put(0, Value::from_u64(1)).unwrap();
        m.put(u64::MAX, Value::from_u64(2)).unwrap();
        assert_eq!(m.get(0), Value::from_u64(1));
        assert_eq!(m.get(u64::MAX), Value::from_u64(2));
        assert_eq!(m.delete(0), Value::from_u64(1));
        assert!(!m.contains_key(0));
        assert!(m.contains_key(u64::MAX));
    }
}
