//! Map: one table behind one lock strategy.
//!
//! Every method takes `&self` and runs inside a single `TableCell::with`
//! call, so with `Locked` each operation is one critical section and
//! operations on a map are linearizable. The raw table below never locks,
//! which is what lets growth run inside `put`'s critical section.

use crate::config::MapConfig;
use crate::error::Result;
use crate::key::TableKey;
use crate::lock::{Locked, Locking, TableCell, Unlocked};
use crate::raw_table::RawTable;
use crate::value::Value;
use core::fmt;
use tracing::trace;

pub struct Map<K: TableKey, L: Locking = Unlocked> {
    table: L::Cell<RawTable<K>>,
}

impl<K: TableKey> Map<K> {
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(MapConfig::new().with_initial_capacity(capacity))
    }
}

impl<K: TableKey> Default for Map<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TableKey> Map<K, Locked> {
    pub fn new_threadsafe() -> Self {
        Self::with_config(MapConfig::default())
    }

    pub fn with_capacity_threadsafe(capacity: usize) -> Self {
        Self::with_config(MapConfig::new().with_initial_capacity(capacity))
    }
}

impl<K: TableKey, L: Locking> Map<K, L> {
    /// Builds a map; aborts on allocation failure like `Vec::with_capacity`.
    pub fn with_config(config: MapConfig) -> Self {
        let table = RawTable::new(config.normalized_capacity());
        Self::from_table(table)
    }

    /// Builds a map, reporting allocation failure instead of aborting.
    pub fn try_with_config(config: MapConfig) -> Result<Self> {
        let table = RawTable::try_new(config.normalized_capacity())?;
        Ok(Self::from_table(table))
    }

    fn from_table(table: RawTable<K>) -> Self {
        trace!(
            capacity = table.capacity(),
            thread_safe = L::THREAD_SAFE,
            "created hash map"
        );
        Self {
            table: TableCell::new(table),
        }
    }

    pub fn len(&self) -> usize {
        self.table.with(|t| t.len())
    }
    pub fn is_empty(&self) -> bool {
        self.table.with(|t| t.is_empty())
    }
    pub fn capacity(&self) -> usize {
        self.table.with(|t| t.capacity())
    }
    pub fn is_thread_safe(&self) -> bool {
        L::THREAD_SAFE
    }

    /// Inserts `key` or overwrites its value, returning the value it
    /// replaced. On error the map's contents are unchanged.
    pub fn put(&self, key: &K::Query, value: Value) -> Result<Option<Value>> {
        self.table.with(|t| t.put(key, value))
    }

    /// Value stored under `key`, or `Value::NULL` when absent.
    pub fn get(&self, key: &K::Query) -> Value {
        self.lookup(key).unwrap_or(Value::NULL)
    }

    /// Like `get`, but tells a stored `Value::NULL` apart from absence.
    pub fn lookup(&self, key: &K::Query) -> Option<Value> {
        self.table.with(|t| t.get(key))
    }

    pub fn contains_key(&self, key: &K::Query) -> bool {
        self.table.with(|t| t.contains_key(key))
    }

    /// Removes `key` and returns its value, or `Value::NULL` when absent.
    pub fn delete(&self, key: &K::Query) -> Value {
        self.remove(key).unwrap_or(Value::NULL)
    }

    pub fn remove(&self, key: &K::Query) -> Option<Value> {
        self.table.with(|t| t.remove(key))
    }

    /// Grows the table to `capacity` slots; smaller requests are ignored.
    pub fn resize(&self, capacity: usize) -> Result<()> {
        self.table.with(|t| t.resize(capacity))
    }

    pub fn clear(&self) {
        self.table.with(|t| t.clear())
    }

    /// Restartable cursor over the slot array. Start with `*cursor == 0`;
    /// each call returns a copy of the next live entry and moves the cursor
    /// past it, and `None` once the whole array has been walked.
    ///
    /// Each step is its own critical section. A pass interleaved with
    /// writers from other threads may miss or repeat entries that move
    /// during a resize; hold off writers for the full pass, or use
    /// `for_each`, when that matters.
    pub fn next(&self, cursor: &mut usize) -> Option<(K, Value)> {
        self.table
            .with(|t| t.next_entry(cursor).map(|(k, v)| (k.clone(), v)))
    }

    /// Visits every live entry under a single critical section.
    ///
    /// `f` must not call back into this map: an unlocked map panics and a
    /// locked one deadlocks.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K::Query, Value),
    {
        self.table.with(|t| {
            for (k, v) in t.iter() {
                f(k.as_query(), v);
            }
        })
    }

    /// Releases the map after handing every live value to `destructor`,
    /// e.g. to free pointer payloads. Plain `drop` is the variant without a
    /// destructor.
    pub fn free_with<F>(self, destructor: F)
    where
        F: FnMut(Value),
    {
        self.table.into_inner().free_with(destructor)
    }
}

impl<K: TableKey, L: Locking> fmt::Debug for Map<K, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.with(|t| {
            f.debug_struct("Map")
                .field("len", &t.len())
                .field("capacity", &t.capacity())
                .field("tombstones", &t.tombstones())
                .field("thread_safe", &L::THREAD_SAFE)
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ByteKey;

    fn v(u: u64) -> Value {
        Value::from_u64(u)
    }

    #[test]
    fn unlocked_and_locked_behave_alike() {
        let a: Map<u64> = Map::with_capacity(4);
        let b: Map<u64, Locked> = Map::with_capacity_threadsafe(4);
        for k in [10u64, 20, 30, 40, 50] {
            a.put(&k, v(k * 2)).unwrap();
            b.put(&k, v(k * 2)).unwrap();
        }
        for k in [10u64, 20, 30, 40, 50] {
            assert_eq!(a.get(&k), v(k * 2));
            assert_eq!(b.get(&k), v(k * 2));
        }
        assert_eq!(a.len(), b.len());
        assert!(a.capacity() > 4);
        assert!(b.capacity() > 4);
        assert!(!a.is_thread_safe());
        assert!(b.is_thread_safe());
    }

    #[test]
    fn null_sentinel_vs_lookup() {
        let m: Map<ByteKey> = Map::new();
        m.put(b"zero", Value::NULL).unwrap();
        assert_eq!(m.get(b"zero"), Value::NULL);
        assert_eq!(m.get(b"missing"), Value::NULL);
        assert_eq!(m.lookup(b"zero"), Some(Value::NULL));
        assert_eq!(m.lookup(b"missing"), None);
        assert!(m.contains_key(b"zero"));
        assert!(!m.contains_key(b"missing"));
        assert_eq!(m.remove(b"zero"), Some(Value::NULL));
        assert_eq!(m.remove(b"zero"), None);
    }

    #[test]
    fn for_each_reentry_panics_when_unlocked() {
        let m: Map<u64> = Map::new();
        m.put(&1, v(1)).unwrap();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.for_each(|_, _| {
                let _ = m.len();
            });
        }));
        assert!(res.is_err());
    }

    #[test]
    fn try_with_config_reports_allocation_failure() {
        let r: Result<Map<u64>> =
            Map::try_with_config(MapConfig::new().with_initial_capacity(usize::MAX));
        assert!(matches!(
            r,
            Err(crate::error::Error::AllocationFailure { .. })
        ));
    }

    #[test]
    fn debug_reports_shape() {
        let m: Map<u64> = Map::with_capacity(8);
        m.put(&1, v(1)).unwrap();
        let s = format!("{:?}", m);
        assert!(s.contains("len: 1"));
        assert!(s.contains("capacity: 8"));
    }
}
