//! Error types for map construction and growth.

use thiserror::Error;

/// Result type alias for fallible map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that can leave a `put` or `resize` unapplied.
///
/// A missing key is not an error: `get`/`delete` report it with
/// `Value::NULL` and `lookup`/`remove` with `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The slot array or a key copy could not be allocated. The map is
    /// left exactly as it was before the call.
    #[error("allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },

    /// Growing the table would overflow the addressable slot count.
    #[error("capacity overflow: cannot grow beyond {capacity} slots")]
    CapacityOverflow { capacity: usize },
}

impl Error {
    pub(crate) fn alloc<T>(count: usize) -> Self {
        Error::AllocationFailure {
            requested: count.saturating_mul(core::mem::size_of::<T>()),
        }
    }
}
