//! Fixed-capacity record of recently consumed tick indices.

/// Capacity used by the demo application.
pub const DEFAULT_HISTORY_LEN: usize = 10;

/// Circular buffer where slot `index % N` holds the last index written there.
///
/// Overwrites silently; meant for inspection with a debugger or in tests, not
/// for control decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickHistory<const N: usize = DEFAULT_HISTORY_LEN> {
    slots: [u32; N],
}

impl<const N: usize> TickHistory<N> {
    const NON_EMPTY: () = assert!(N > 0, "tick history needs at least one slot");

    /// Creates a zero-filled history.
    pub const fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self { slots: [0; N] }
    }

    /// Stores `tick_index` in slot `tick_index % N`.
    pub fn record(&mut self, tick_index: u32) {
        self.slots[tick_index as usize % N] = tick_index;
    }

    /// Value held by `slot`.
    pub fn get(&self, slot: usize) -> Option<u32> {
        self.slots.get(slot).copied()
    }

    pub fn slots(&self) -> &[u32; N] {
        &self.slots
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for TickHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}
