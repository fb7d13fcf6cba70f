//! Interrupt-to-foreground tick handoff.
//!
//! [`TickSignal`] is a single-slot mailbox: the pending flag and the tick
//! counter share one atomic word, so the foreground sees both or neither.
//! Bit 0 is the pending flag, bits 1..32 hold the tick index.

use core::sync::atomic::{AtomicU32, Ordering};

const PENDING: u32 = 1;
const INDEX_SHIFT: u32 = 1;
const INDEX_ONE: u32 = 1 << INDEX_SHIFT;

/// Largest tick index; the next signal wraps the index to zero.
pub const TICK_INDEX_MAX: u32 = u32::MAX >> INDEX_SHIFT;

/// Pending flag plus monotonic tick counter shared between the interrupt
/// handler (producer) and the foreground loop (consumer).
///
/// Signals are coalesced, not queued: several expiries between two
/// [`try_consume`](Self::try_consume) calls are observed once, carrying the
/// latest index.
#[derive(Debug)]
pub struct TickSignal {
    word: AtomicU32,
}

impl TickSignal {
    /// Creates an idle mailbox at tick index 0.
    pub const fn new() -> Self {
        Self {
            word: AtomicU32::new(0),
        }
    }

    #[cfg(test)]
    pub(crate) const fn starting_at(tick_index: u32) -> Self {
        Self {
            word: AtomicU32::new((tick_index & TICK_INDEX_MAX) << INDEX_SHIFT),
        }
    }

    /// Marks a tick pending and advances the tick index.
    ///
    /// Interrupt context only. The foreground can only clear the pending bit,
    /// so the update loop retries at most once per concurrent consume.
    pub fn signal(&self) {
        // The closure always returns `Some`, so the update cannot fail.
        let _ = self
            .word
            .fetch_update(Ordering::Release, Ordering::Relaxed, |word| {
                Some((word & !PENDING).wrapping_add(INDEX_ONE) | PENDING)
            });
    }

    /// Takes the pending tick, if any, returning its index.
    ///
    /// Foreground context only. Never blocks.
    pub fn try_consume(&self) -> Option<u32> {
        if self.word.load(Ordering::Relaxed) & PENDING == 0 {
            return None;
        }
        let previous = self.word.fetch_and(!PENDING, Ordering::Acquire);
        (previous & PENDING != 0).then_some(previous >> INDEX_SHIFT)
    }

    /// Returns true while a tick waits to be consumed.
    pub fn is_pending(&self) -> bool {
        self.word.load(Ordering::Acquire) & PENDING != 0
    }

    /// Number of expiries signalled so far, modulo `TICK_INDEX_MAX + 1`.
    pub fn tick_index(&self) -> u32 {
        self.word.load(Ordering::Acquire) >> INDEX_SHIFT
    }
}

impl Default for TickSignal {
    fn default() -> Self {
        Self::new()
    }
}
