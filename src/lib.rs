//! usf-hashmap: an open-addressing map with two keyspaces (owned byte
//! strings and `u64`), explicit tombstones, and optional locking.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one probing algorithm shared by both keyspaces, with the
//!   tombstone and ownership rules carried by types instead of pointer
//!   tricks.
//! - Layers:
//!   - `hash`: `string_hash` (djb2) and the `mix64` avalanche mixer; the
//!     `ProbeSeq` walk seeds with the key's primary hash and steps by
//!     re-mixing the full 64-bit state.
//!   - `RawTable<K>`: the slot array (`Empty | Tombstone | Occupied`),
//!     growth policy, resize, and the restartable cursor. Never locks.
//!   - `Map<K, L>`: one `RawTable` behind a lock strategy `L`
//!     (`Unlocked` or `Locked`); every operation is one critical section.
//!   - `StrHashMap` / `IntHashMap`: thin keyspace façades over `Map`.
//!
//! Constraints
//! - Capacity is kept at least twice the live entry count: a `put` that
//!   would push `len + 1` past `capacity / 2` doubles the table first.
//! - Deleting a key leaves a tombstone; searches walk past tombstones and
//!   stop at the first empty slot. Inserts reuse the first tombstone on the
//!   walk once the key is known to be absent.
//! - When live entries plus tombstones would leave fewer than a quarter of
//!   the slots empty, the table is rebuilt at the same size. Growth never
//!   shrinks.
//! - Resize allocates the new array before moving anything; on failure the
//!   map is unchanged.
//!
//! Locking
//! - `Unlocked` maps are `!Sync`; the compiler rejects sharing them.
//! - `Locked` maps serialize every call through a `parking_lot::Mutex`.
//!   Growth runs inside the critical section of the `put` that triggered
//!   it, so the mutex does not need to be reentrant.
//! - Cursor iteration (`next`) locks per step; a full pass is only
//!   consistent if no other thread writes meanwhile. `for_each` holds the
//!   lock for the whole pass.
//!
//! Not-found sentinel
//! - `get`/`delete` return `Value::NULL` for absent keys, which is the
//!   same bits as a stored zero. `lookup`/`remove` return `Option<Value>`
//!   for callers that need to tell them apart.

pub mod config;
pub mod error;
mod hash;
mod int_map;
pub mod key;
mod lock;
mod map;
mod raw_table;
mod raw_table_proptest;
mod str_map;
mod value;

// Public surface
pub use config::MapConfig;
pub use error::{Error, Result};
pub use hash::{mix64, string_hash};
pub use int_map::{IntHashMap, SyncIntHashMap};
pub use key::{ByteKey, TableKey};
pub use lock::{Locked, Locking, Unlocked};
pub use map::Map;
pub use str_map::{StrHashMap, SyncStrHashMap};
pub use value::Value;
