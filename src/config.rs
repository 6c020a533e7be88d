//! Construction-time settings and the growth constants.

/// Slot count used when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 16;

/// Capacity multiplier applied on growth. The table also keeps its live
/// entry count at or below `capacity / GROWTH_FACTOR`.
pub const GROWTH_FACTOR: usize = 2;

/// Smallest capacity a table is ever created with; the probe reduces
/// modulo the capacity, so it must never be zero.
pub const MIN_CAPACITY: usize = 1;

/// Settings for a new map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapConfig {
    pub initial_capacity: usize,
}

impl MapConfig {
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
        }
    }

    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Initial capacity clamped to `MIN_CAPACITY`.
    pub fn normalized_capacity(&self) -> usize {
        self.initial_capacity.max(MIN_CAPACITY)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a table holding `live` entries must grow before taking one more.
#[inline]
pub(crate) fn over_load_limit(live: usize, capacity: usize) -> bool {
    live + 1 > capacity / GROWTH_FACTOR
}

/// Most used slots (live plus tombstones) a table of `capacity` may hold.
/// At least a quarter of the slots, and never fewer than one, stay `Empty`
/// so every search ends.
#[inline]
pub(crate) fn purge_limit(capacity: usize) -> usize {
    capacity - capacity.div_ceil(4)
}

/// Whether a table with `used` non-empty slots must drop its tombstones
/// before taking one more entry.
#[inline]
pub(crate) fn over_purge_limit(used: usize, capacity: usize) -> bool {
    used + 1 > purge_limit(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamp() {
        assert_eq!(MapConfig::default().normalized_capacity(), DEFAULT_CAPACITY);
        assert_eq!(
            MapConfig::new().with_initial_capacity(0).normalized_capacity(),
            MIN_CAPACITY
        );
        assert_eq!(
            MapConfig::new().with_initial_capacity(128).normalized_capacity(),
            128
        );
    }

    #[test]
    fn load_limit_is_half_capacity() {
        assert!(!over_load_limit(0, 4));
        assert!(!over_load_limit(1, 4));
        assert!(over_load_limit(2, 4));
        assert!(over_load_limit(0, 1));
    }

    #[test]
    fn purge_limit_leaves_a_quarter_empty() {
        assert_eq!(purge_limit(1), 0);
        assert_eq!(purge_limit(2), 1);
        assert_eq!(purge_limit(4), 3);
        assert_eq!(purge_limit(16), 12);
        assert_eq!(purge_limit(16384), 12288);
        for capacity in 1..100 {
            assert!(capacity - purge_limit(capacity) >= 1);
        }
        assert!(!over_purge_limit(11, 16));
        assert!(over_purge_limit(12, 16));
    }
}
