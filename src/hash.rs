//! Hash functions and the probe sequence built on them.

/// Multiplicative/additive string hash (djb2): `h = h * 33 + byte`.
///
/// Order dependent; bytes are taken as unsigned.
#[inline]
pub fn string_hash(bytes: &[u8]) -> u64 {
    bytes.iter().fold(5381u64, |h, &b| {
        (h << 5).wrapping_add(h).wrapping_add(u64::from(b))
    })
}

/// 64-bit avalanche mixer. A bijection on `u64`, used both as the primary
/// hash of integer keys and to step a probe from one state to the next.
#[inline]
pub fn mix64(mut v: u64) -> u64 {
    v = v.wrapping_add(137);
    v ^= v >> 33;
    v = v.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    v ^= v >> 31;
    v = v.wrapping_mul(0xA635_194A_4D16_E3CB);
    v ^= v >> 27;
    v
}

/// Infinite, deterministic walk over slot indices of a table of `capacity`
/// slots.
///
/// The full 64-bit state is carried between steps and only reduced modulo
/// the capacity to pick a slot, so keys that collide once do not follow
/// each other for the rest of the walk.
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    state: u64,
    capacity: u64,
}

impl ProbeSeq {
    pub fn new(primary_hash: u64, capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            state: primary_hash,
            capacity: capacity as u64,
        }
    }

    /// Slot for the current step; advances the state.
    #[inline]
    pub fn next_slot(&mut self) -> usize {
        let slot = (self.state % self.capacity) as usize;
        self.state = mix64(self.state);
        slot
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        Some(self.next_slot())
    }
}
