#![cfg(test)]

// Property tests for RawTable kept inside the crate so they can check the
// slot-level counters (`tombstones`) that the public maps do not expose.

use crate::config::purge_limit;
use crate::key::{ByteKey, TableKey};
use crate::raw_table::RawTable;
use crate::value::Value;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::Hash;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, u64),
    Get(usize),
    Remove(usize),
    Resize(usize),
    Clear,
    Cursor,
}

fn arb_ops(pool_len: usize) -> impl Strategy<Value = Vec<Op>> {
    let idx = 0..pool_len;
    let op = prop_oneof![
        6 => (idx.clone(), any::<u64>()).prop_map(|(i, v)| Op::Put(i, v)),
        3 => idx.clone().prop_map(Op::Get),
        4 => idx.prop_map(Op::Remove),
        1 => (0usize..300).prop_map(Op::Resize),
        1 => Just(Op::Clear),
        1 => Just(Op::Cursor),
    ];
    proptest::collection::vec(op, 1..120)
}

fn arb_byte_scenario() -> impl Strategy<Value = (Vec<Vec<u8>>, usize, Vec<Op>)> {
    proptest::collection::btree_set(proptest::collection::vec(any::<u8>(), 0..6), 1..=24)
        .prop_flat_map(|pool| {
            let pool: Vec<Vec<u8>> = pool.into_iter().collect();
            let n = pool.len();
            (Just(pool), 0usize..=8, arb_ops(n))
        })
}

fn arb_int_scenario() -> impl Strategy<Value = (Vec<u64>, usize, Vec<Op>)> {
    proptest::collection::btree_set(any::<u64>(), 1..=40).prop_flat_map(|pool| {
        let pool: Vec<u64> = pool.into_iter().collect();
        let n = pool.len();
        (Just(pool), 0usize..=8, arb_ops(n))
    })
}

// Drives one table and a `HashMap` model through the same operations and
// checks, after every step:
// - lookups, overwrite results and removals agree with the model;
// - `len` equals the model's size;
// - `2 * len <= capacity` (growth);
// - `len + tombstones <= purge_limit(capacity)` (purge keeps a quarter of
//   the slots empty);
// - a full cursor pass yields exactly the model's key set, once each.
fn run_state_machine<K, O>(pool: &[O], capacity: usize, ops: Vec<Op>) -> Result<(), TestCaseError>
where
    K: TableKey,
    K::Query: ToOwned<Owned = O>,
    O: Borrow<K::Query> + Clone + Eq + Hash + Ord + Debug,
{
    fn q<K: TableKey, O: Borrow<K::Query>>(o: &O) -> &K::Query {
        o.borrow()
    }

    let mut sut: RawTable<K> = RawTable::new(capacity);
    let mut model: HashMap<O, Value> = HashMap::new();

    for op in ops {
        match op {
            Op::Put(i, raw) => {
                let k = &pool[i];
                let v = Value::from_u64(raw);
                let prev = sut.put(q::<K, O>(k), v).expect("put must succeed");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(q::<K, O>(k)), model.get::<O>(k).copied());
                prop_assert_eq!(sut.contains_key(q::<K, O>(k)), model.contains_key::<O>(k));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(q::<K, O>(k)), model.remove::<O>(k));
                prop_assert_eq!(sut.get(q::<K, O>(k)), None);
            }
            Op::Resize(n) => {
                let before = sut.capacity();
                sut.resize(n).expect("resize must succeed");
                prop_assert_eq!(sut.capacity(), before.max(n));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
            Op::Cursor => {
                let mut cursor = 0;
                let mut seen = BTreeMap::new();
                while let Some((k, v)) = sut.next_entry(&mut cursor) {
                    let owned: O = ToOwned::to_owned(k.as_query());
                    prop_assert!(seen.insert(owned, v).is_none(), "cursor repeated a key");
                }
                let expected: BTreeMap<_, _> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(2 * sut.len() <= sut.capacity());
        prop_assert!(
            sut.len() + sut.tombstones() <= purge_limit(sut.capacity()),
            "len {} tombstones {} capacity {}",
            sut.len(),
            sut.tombstones(),
            sut.capacity()
        );
    }

    let live: BTreeSet<O> = sut.iter().map(|(k, _)| ToOwned::to_owned(k.as_query())).collect();
    let expected: BTreeSet<_> = model.keys().cloned().collect();
    prop_assert_eq!(live, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_byte_table_matches_model((pool, capacity, ops) in arb_byte_scenario()) {
        run_state_machine::<ByteKey, Vec<u8>>(&pool, capacity, ops)?;
    }

    #[test]
    fn prop_int_table_matches_model((pool, capacity, ops) in arb_int_scenario()) {
        run_state_machine::<u64, u64>(&pool, capacity, ops)?;
    }

    // Property: deleting and re-inserting the same small key set forever
    // never grows the table and never loses a live key.
    #[test]
    fn prop_churn_stays_bounded(keys in proptest::collection::btree_set(any::<u64>(), 1..=4), rounds in 1usize..200) {
        let mut t: RawTable<u64> = RawTable::new(16);
        let keys: Vec<u64> = keys.into_iter().collect();
        for r in 0..rounds {
            for &k in &keys {
                t.put(&k, Value::from_u64(r as u64)).unwrap();
            }
            for &k in &keys {
                prop_assert_eq!(t.remove(&k), Some(Value::from_u64(r as u64)));
            }
        }
        prop_assert_eq!(t.capacity(), 16);
        prop_assert!(t.is_empty());
    }
}
