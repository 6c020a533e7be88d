//! Lock strategies for `Map`.
//!
//! A map is parameterized by how its table is guarded:
//! - `Unlocked`: the table sits in a `RefCell`. The map is `!Sync`, so it
//!   cannot be shared across threads at all, and a nested call from inside
//!   a `for_each` callback panics instead of corrupting the table.
//! - `Locked`: the table sits in a `parking_lot::Mutex`. Every operation runs
//!   in exactly one critical section. Growth happens inside the critical
//!   section of the `put` that needs it and never re-locks, so the mutex is
//!   not reentrant.

use core::cell::RefCell;
use parking_lot::Mutex;

/// Interior-mutable container for a table.
pub trait TableCell<T> {
    fn new(value: T) -> Self;

    /// Runs `f` with exclusive access for the whole call.
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;

    fn into_inner(self) -> T;
}

/// Selects the `TableCell` a map uses.
pub trait Locking: private::Sealed {
    type Cell<T>: TableCell<T>;

    const THREAD_SAFE: bool;
}

/// Single-threaded maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlocked;

/// Maps shared between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Locked;

impl Locking for Unlocked {
    type Cell<T> = UnlockedCell<T>;
    const THREAD_SAFE: bool = false;
}

impl Locking for Locked {
    type Cell<T> = LockedCell<T>;
    const THREAD_SAFE: bool = true;
}

#[derive(Debug)]
pub struct UnlockedCell<T>(RefCell<T>);

impl<T> TableCell<T> for UnlockedCell<T> {
    fn new(value: T) -> Self {
        UnlockedCell(RefCell::new(value))
    }

    #[inline]
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self
            .0
            .try_borrow_mut()
            .unwrap_or_else(|_| panic!("reentrancy detected: nested entry into map"));
        f(&mut *guard)
    }

    fn into_inner(self) -> T {
        self.0.into_inner()
    }
}

#[derive(Debug)]
pub struct LockedCell<T>(Mutex<T>);

impl<T> TableCell<T> for LockedCell<T> {
    fn new(value: T) -> Self {
        LockedCell(Mutex::new(value))
    }

    #[inline]
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.0.lock();
        f(&mut *guard)
    }

    fn into_inner(self) -> T {
        self.0.into_inner()
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::Unlocked {}
    impl Sealed for super::Locked {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn unlocked_cell_gives_exclusive_access() {
        let c = UnlockedCell::new(1u32);
        c.with(|v| *v += 1);
        assert_eq!(c.with(|v| *v), 2);
        assert_eq!(c.into_inner(), 2);
    }

    #[test]
    fn unlocked_cell_panics_on_nested_entry() {
        let c = UnlockedCell::new(0u32);
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            c.with(|_| c.with(|v| *v += 1));
        }));
        assert!(res.is_err(), "expected nested entry to panic");
    }

    #[test]
    fn locked_cell_serializes_threads() {
        let c = Arc::new(LockedCell::new(0u64));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&c);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        c.with(|v| *v += 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(c.with(|v| *v), 4000);
    }

    #[test]
    fn thread_safety_flags() {
        assert!(!Unlocked::THREAD_SAFE);
        assert!(Locked::THREAD_SAFE);
    }
}
