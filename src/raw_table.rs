//! RawTable: the open-addressing slot array shared by both keyspaces.
//!
//! The table itself is unsynchronized and takes `&mut self` for every
//! mutation; locking lives one layer up in `Map`. Because nothing in here
//! ever takes a lock, growth triggered from `put` rebuilds the table inside
//! the caller's critical section without re-entering it.

use crate::config::{over_load_limit, over_purge_limit, GROWTH_FACTOR, MIN_CAPACITY};
use crate::error::{Error, Result};
use crate::hash::ProbeSeq;
use crate::key::TableKey;
use crate::value::Value;
use core::mem;
use tracing::debug;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K> {
    key: K,
    value: Value,
}

#[derive(Clone, Debug)]
pub(crate) enum Slot<K> {
    /// Never used since the last rebuild. Ends a search.
    Empty,
    /// Deleted. Searches walk past it; inserts may reuse it.
    Tombstone,
    Occupied(Entry<K>),
}

/// Outcome of walking a key's probe sequence for insertion.
enum Probe {
    Found(usize),
    Vacant(usize),
}

#[derive(Clone, Debug)]
pub struct RawTable<K> {
    slots: Vec<Slot<K>>,
    size: usize,
    tombstones: usize,
}

/// Iterator over live entries in slot order.
pub struct Iter<'a, K> {
    it: core::slice::Iter<'a, Slot<K>>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (&'a K, Value);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.by_ref().find_map(|s| match s {
            Slot::Occupied(e) => Some((&e.key, e.value)),
            _ => None,
        })
    }
}

impl<K: TableKey> RawTable<K> {
    /// Creates an empty table; aborts on allocation failure like `Vec`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        Self::from_slots(slots)
    }

    pub fn try_new(capacity: usize) -> Result<Self> {
        let capacity = capacity.max(MIN_CAPACITY);
        Ok(Self::from_slots(Self::alloc_slots(capacity)?))
    }

    fn from_slots(slots: Vec<Slot<K>>) -> Self {
        Self {
            slots,
            size: 0,
            tombstones: 0,
        }
    }

    fn alloc_slots(capacity: usize) -> Result<Vec<Slot<K>>> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| Error::alloc::<Slot<K>>(capacity))?;
        slots.resize_with(capacity, || Slot::Empty);
        Ok(slots)
    }

    pub fn len(&self) -> usize {
        self.size
    }
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Slot index holding `query`, if present.
    fn find(&self, query: &K::Query) -> Option<usize> {
        let mut probe = ProbeSeq::new(K::hash_query(query), self.capacity());
        loop {
            let i = probe.next_slot();
            match &self.slots[i] {
                Slot::Empty => return None,
                Slot::Occupied(e) if e.key.matches(query) => return Some(i),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
        }
    }

    /// Walks to the matching slot, or to the first `Empty` slot. A vacant
    /// result prefers the first tombstone passed on the way, so a key is
    /// only ever stored once along its sequence.
    fn find_for_insert(&self, query: &K::Query) -> Probe {
        let mut probe = ProbeSeq::new(K::hash_query(query), self.capacity());
        let mut first_tombstone = None;
        loop {
            let i = probe.next_slot();
            match &self.slots[i] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(i)),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(i);
                }
                Slot::Occupied(e) if e.key.matches(query) => return Probe::Found(i),
                Slot::Occupied(_) => {}
            }
        }
    }

    /// Makes room for one more entry: doubles the table when the live count
    /// would pass half the capacity, or rebuilds at the same capacity when
    /// live entries plus tombstones would leave fewer than a quarter of the
    /// slots empty. Between two purges at least `capacity / 4` deletes
    /// happen, so the rebuild cost stays amortized.
    fn reserve_one(&mut self) -> Result<()> {
        let capacity = self.capacity();
        if over_load_limit(self.size, capacity) {
            let grown = capacity
                .checked_mul(GROWTH_FACTOR)
                .ok_or(Error::CapacityOverflow { capacity })?;
            self.rebuild(grown)
        } else if over_purge_limit(self.size + self.tombstones, capacity) {
            self.rebuild(capacity)
        } else {
            Ok(())
        }
    }

    /// Inserts or overwrites. Returns the previous value on overwrite.
    ///
    /// On error the table holds the same entries as before the call.
    pub fn put(&mut self, query: &K::Query, value: Value) -> Result<Option<Value>> {
        self.reserve_one()?;
        match self.find_for_insert(query) {
            Probe::Found(i) => match &mut self.slots[i] {
                Slot::Occupied(e) => Ok(Some(mem::replace(&mut e.value, value))),
                _ => unreachable!("probe reported a live slot"),
            },
            Probe::Vacant(i) => {
                let key = K::try_from_query(query)?;
                if let Slot::Tombstone = self.slots[i] {
                    self.tombstones -= 1;
                }
                self.slots[i] = Slot::Occupied(Entry { key, value });
                self.size += 1;
                Ok(None)
            }
        }
    }

    pub fn get(&self, query: &K::Query) -> Option<Value> {
        let i = self.find(query)?;
        match &self.slots[i] {
            Slot::Occupied(e) => Some(e.value),
            _ => None,
        }
    }

    pub fn contains_key(&self, query: &K::Query) -> bool {
        self.find(query).is_some()
    }

    /// Removes `query`, leaving a tombstone. The owned key is dropped here.
    pub fn remove(&mut self, query: &K::Query) -> Option<Value> {
        let i = self.find(query)?;
        match mem::replace(&mut self.slots[i], Slot::Tombstone) {
            Slot::Occupied(e) => {
                self.size -= 1;
                self.tombstones += 1;
                Some(e.value)
            }
            other => {
                self.slots[i] = other;
                None
            }
        }
    }

    /// Grows to `new_capacity`. No-op unless it is larger than the current
    /// capacity.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        self.rebuild(new_capacity)
    }

    /// Moves every live entry into a fresh array of `capacity` slots and
    /// drops all tombstones. The only fallible step is the allocation, done
    /// before anything is moved.
    fn rebuild(&mut self, capacity: usize) -> Result<()> {
        let mut fresh = Self::alloc_slots(capacity)?;
        let old_capacity = self.capacity();
        let dropped = self.tombstones;

        for slot in self.slots.drain(..) {
            if let Slot::Occupied(entry) = slot {
                let mut probe = ProbeSeq::new(entry.key.hash_key(), capacity);
                let i = loop {
                    let i = probe.next_slot();
                    if let Slot::Empty = fresh[i] {
                        break i;
                    }
                };
                fresh[i] = Slot::Occupied(entry);
            }
        }
        self.slots = fresh;
        self.tombstones = 0;

        debug!(
            old_capacity,
            new_capacity = capacity,
            live = self.size,
            tombstones_dropped = dropped,
            "rebuilt hash table"
        );
        Ok(())
    }

    /// Cursor step over raw slot indices. Returns the next live entry at or
    /// after `*cursor` and leaves the cursor just past it.
    pub fn next_entry(&self, cursor: &mut usize) -> Option<(&K, Value)> {
        while *cursor < self.slots.len() {
            let i = *cursor;
            *cursor += 1;
            if let Slot::Occupied(e) = &self.slots[i] {
                return Some((&e.key, e.value));
            }
        }
        None
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            it: self.slots.iter(),
        }
    }

    /// Drops every entry; capacity is kept.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = Slot::Empty);
        self.size = 0;
        self.tombstones = 0;
    }

    /// Consumes the table, handing each live value to `f`.
    pub fn free_with<F>(self, mut f: F)
    where
        F: FnMut(Value),
    {
        for slot in self.slots {
            if let Slot::Occupied(e) = slot {
                f(e.value);
            }
        }
    }
}
