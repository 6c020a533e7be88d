//! StrHashMap: the byte-string keyspace.

use crate::config::MapConfig;
use crate::error::Result;
use crate::key::ByteKey;
use crate::lock::{Locked, Locking, Unlocked};
use crate::map::Map;
use crate::value::Value;

/// Map from byte strings to `Value`s. Keys are copied into storage owned by
/// the map on first insertion and released when deleted, cleared, or when
/// the map is dropped.
///
/// `StrHashMap` (the default, `Unlocked`) is single-threaded;
/// `StrHashMap<Locked>` (alias `SyncStrHashMap`) can be shared across
/// threads and serializes every operation.
#[derive(Debug)]
pub struct StrHashMap<L: Locking = Unlocked> {
    inner: Map<ByteKey, L>,
}

pub type SyncStrHashMap = StrHashMap<Locked>;

impl StrHashMap {
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

impl Default for StrHashMap {
    fn default() -> Self {
        Self::new()
    }
}

impl StrHashMap<Locked> {
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

impl<L: Locking> StrHashMap<L> {
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

    /// Inserts or overwrites; returns the replaced value, if any.
    pub fn put(&self, key: impl AsRef<[u8]>, value: Value) -> Result<Option<Value>> {
        self.inner.put(key.as_ref(), value)
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Value {
        self.inner.get(key.as_ref())
    }

    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Option<Value> {
        self.inner.lookup(key.as_ref())
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.contains_key(key.as_ref())
    }

    pub fn delete(&self, key: impl AsRef<[u8]>) -> Value {
        self.inner.delete(key.as_ref())
    }

    pub fn remove(&self, key: impl AsRef<[u8]>) -> Option<Value> {
        self.inner.remove(key.as_ref())
    }

    pub fn resize(&self, capacity: usize) -> Result<()> {
        self.inner.resize(capacity)
    }

    pub fn clear(&self) {
        self.inner.clear()
    }

    /// Cursor step; see `Map::next`. Yields a copy of the key.
    pub fn next(&self, cursor: &mut usize) -> Option<(ByteKey, Value)> {
        self.inner.next(cursor)
    }

    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&[u8], Value),
    {
        self.inner.for_each(f)
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
    fn str_and_bytes_address_the_same_key() {
        let m = StrHashMap::new();
        m.put("alpha", Value::from_u64(1)).unwrap();
        assert_eq!(m.get(b"alpha"), Value::from_u64(1));
        assert_eq!(m.get(String::from("alpha")), Value::from_u64(1));
        assert!(m.contains_key(vec![b'a', b'l', b'p', b'h', b'a']));
    }

    #[test]
    fn non_utf8_and_empty_keys() {
        let m = StrHashMap::new();
        m.put([0xffu8, 0x00, 0x80], Value::from_u64(7)).unwrap();
        m.put("", Value::from_u64(8)).unwrap();
        assert_eq!(m.get([0xffu8, 0x00, 0x80]), Value::from_u64(7));
        assert_eq!(m.get([0xffu8, 0x00]), Value::NULL);
        assert_eq!(m.get(""), Value::from_u64(8));
        assert_eq!(m.len(), 2);
    }
}
