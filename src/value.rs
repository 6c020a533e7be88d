//! Value: the 8-byte tagged payload stored in every entry.

use core::fmt;

/// An untyped 64-bit payload that can be read back as an unsigned integer,
/// a signed integer, a float, or a raw pointer.
///
/// The map never interprets the bits. Whichever view was used to store a
/// value should be used to read it back; the other views return the same
/// bits reinterpreted. `Value::NULL` (all zero bits) is what lookups return
/// for absent keys, so a stored zero and a missing key look alike through
/// `get`; use `lookup` when the difference matters.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Value(u64);

impl Value {
    /// All bits zero; also the "not found" result of `get` and `delete`.
    pub const NULL: Value = Value(0);
    pub const TRUE: Value = Value(1);

    #[inline]
    pub const fn from_u64(u: u64) -> Self {
        Value(u)
    }

    #[inline]
    pub const fn from_i64(i: i64) -> Self {
        Value(i as u64)
    }

    #[inline]
    pub fn from_f64(d: f64) -> Self {
        Value(d.to_bits())
    }

    /// Stores the address only; the map never dereferences or frees it.
    #[inline]
    pub fn from_ptr<T>(p: *mut T) -> Self {
        Value(p as usize as u64)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    #[inline]
    pub fn as_ptr<T>(self) -> *mut T {
        self.0 as usize as *mut T
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::from_u64(u)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::from_i64(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::from_f64(d)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({:#018x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn views_share_the_same_bits() {
        let v = Value::from_i64(-1);
        assert_eq!(v.as_u64(), u64::MAX);
        assert_eq!(v.as_i64(), -1);

        let d = Value::from_f64(2.5);
        assert_eq!(d.as_f64(), 2.5);
        assert_eq!(d.as_u64(), 2.5f64.to_bits());
    }

    #[test]
    fn pointer_payload_keeps_address() {
        let mut slot = 7u32;
        let p: *mut u32 = &mut slot;
        let v = Value::from_ptr(p);
        assert_eq!(v.as_ptr::<u32>(), p);
        assert!(!v.is_null());
    }

    #[test]
    fn null_is_zero_and_default() {
        assert!(Value::NULL.is_null());
        assert_eq!(Value::default(), Value::NULL);
        assert_eq!(Value::from_u64(0), Value::NULL);
        assert_eq!(Value::from(1u64), Value::TRUE);
    }
}
