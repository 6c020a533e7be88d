//! The two keyspaces a table can hold.
//!
//! `TableKey` is sealed: a table is keyed either by owned byte strings
//! (`ByteKey`) or by `u64`. Both share the same probe engine and differ only
//! in how the primary hash is computed, how a stored key is compared against
//! a lookup, and how a lookup is turned into a stored key.

use crate::error::{Error, Result};
use crate::hash::{mix64, string_hash};

/// Owned byte-string key. The table exclusively owns the buffer; it is
/// released when the slot stops being occupied.
pub type ByteKey = Box<[u8]>;

/// A key type a table can store.
pub trait TableKey: private::Sealed + Clone {
    /// Borrowed form used for lookups.
    type Query: ?Sized;

    /// Primary hash of a lookup key; seeds the probe sequence.
    fn hash_query(query: &Self::Query) -> u64;

    fn matches(&self, query: &Self::Query) -> bool;

    fn as_query(&self) -> &Self::Query;

    /// Builds the stored form of a key that is not yet in the table.
    fn try_from_query(query: &Self::Query) -> Result<Self>;

    #[inline]
    fn hash_key(&self) -> u64 {
        Self::hash_query(self.as_query())
    }
}

impl TableKey for ByteKey {
    type Query = [u8];

    #[inline]
    fn hash_query(query: &[u8]) -> u64 {
        string_hash(query)
    }

    #[inline]
    fn matches(&self, query: &[u8]) -> bool {
        **self == *query
    }

    #[inline]
    fn as_query(&self) -> &[u8] {
        self
    }

    fn try_from_query(query: &[u8]) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(query.len())
            .map_err(|_| Error::alloc::<u8>(query.len()))?;
        buf.extend_from_slice(query);
        Ok(buf.into_boxed_slice())
    }
}

impl TableKey for u64 {
    type Query = u64;

    #[inline]
    fn hash_query(query: &u64) -> u64 {
        mix64(*query)
    }

    #[inline]
    fn matches(&self, query: &u64) -> bool {
        *self == *query
    }

    #[inline]
    fn as_query(&self) -> &u64 {
        self
    }

    #[inline]
    fn try_from_query(query: &u64) -> Result<Self> {
        Ok(*query)
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::ByteKey {}
    impl Sealed for u64 {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_key_copies_and_compares_exactly() {
        let k = ByteKey::try_from_query(b"alpha").unwrap();
        assert_eq!(&*k, b"alpha");
        assert!(k.matches(b"alpha"));
        assert!(!k.matches(b"alph"));
        assert!(!k.matches(b"alphaa"));
        assert_eq!(k.hash_key(), string_hash(b"alpha"));
    }

    #[test]
    fn empty_byte_key_is_a_valid_key() {
        let k = ByteKey::try_from_query(b"").unwrap();
        assert!(k.matches(b""));
        assert_eq!(k.hash_key(), 5381);
    }

    #[test]
    fn integer_keys_are_mixed() {
        assert_eq!(<u64 as TableKey>::hash_query(&42), mix64(42));
        assert!(42u64.matches(&42));
        assert!(!42u64.matches(&43));
        assert_eq!(u64::try_from_query(&7).unwrap(), 7);
    }
}
