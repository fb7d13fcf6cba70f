//! Simulated system timer (STM): free-running counter plus one comparator.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use systime_hal::{CompareTimer, TimerClock};

/// Default simulated timer clock.
pub const DEFAULT_CLOCK_HZ: u32 = 100_000_000;

#[derive(Debug)]
struct StmRegs {
    counter: u32,
    compare: u32,
    width: u32,
    pending: bool,
    irq_enabled: bool,
    /// The counter has reached `compare` since it was last written.
    compare_passed: bool,
}

impl StmRegs {
    fn mask(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    /// Moves the counter and latches if it lands on or steps over `compare`.
    fn step(&mut self, units: u32) {
        let distance = self.compare.wrapping_sub(self.counter) & self.mask();
        self.counter = self.counter.wrapping_add(units);
        if distance != 0 && distance <= units {
            self.compare_passed = true;
            self.pending = true;
        }
    }

    /// Rewrites `compare`. A new value between an already passed compare
    /// point and the counter counts as passed too and latches at once.
    fn write_compare(&mut self, value: u32) {
        let mask = self.mask();
        let behind = self.counter.wrapping_sub(self.compare) & mask;
        let moved = value.wrapping_sub(self.compare) & mask;
        self.compare_passed = self.compare_passed && moved <= behind;
        self.compare = value;
        if self.compare_passed && moved != 0 {
            self.pending = true;
        }
    }
}

/// Handle to a simulated STM; clones share the same registers.
///
/// The comparator latches when an [`advance`](Self::advance) moves the
/// counter onto or past the compare point. Moving a passed compare point
/// forward to a value the counter has also passed latches again, so an
/// overdue expiry is delivered right after its handler runs.
#[derive(Debug, Clone)]
pub struct SimTimer {
    regs: Arc<Mutex<StmRegs>>,
}

impl SimTimer {
    /// Creates a stopped timer with the counter at zero.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a timer whose counter starts at `counter`.
    pub fn starting_at(counter: u32) -> Self {
        Self {
            regs: Arc::new(Mutex::new(StmRegs {
                counter,
                compare: 0,
                width: 32,
                pending: false,
                irq_enabled: false,
                compare_passed: false,
            })),
        }
    }

    fn regs(&self) -> MutexGuard<'_, StmRegs> {
        self.regs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the counter forward by `units` and latches a compare match.
    pub fn advance(&self, units: u32) {
        self.regs().step(units);
    }

    /// Acknowledges a latched compare event if its interrupt is enabled.
    ///
    /// Returns true when the compare interrupt should be raised.
    pub fn take_expiry(&self) -> bool {
        let mut regs = self.regs();
        if regs.pending && regs.irq_enabled {
            regs.pending = false;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.regs().pending
    }

    pub fn irq_enabled(&self) -> bool {
        self.regs().irq_enabled
    }
}

impl Default for SimTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompareTimer for SimTimer {
    fn counter(&self) -> u32 {
        self.regs().counter
    }

    fn compare(&self) -> u32 {
        self.regs().compare
    }

    fn set_compare(&mut self, value: u32) {
        self.regs().write_compare(value);
    }

    fn set_compare_width(&mut self, bits: u32) {
        self.regs().width = bits.clamp(1, 32);
    }

    fn clear_pending(&mut self) {
        self.regs().pending = false;
    }

    fn enable_compare_interrupt(&mut self) {
        self.regs().irq_enabled = true;
    }

    fn disable_compare_interrupt(&mut self) {
        self.regs().irq_enabled = false;
    }
}

/// Fixed-frequency timer clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    hz: u32,
}

impl SimClock {
    pub const fn new(hz: u32) -> Self {
        Self { hz }
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_HZ)
    }
}

impl TimerClock for SimClock {
    fn timer_clock_hz(&self) -> u32 {
        self.hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_match_is_cleared_by_configuration() {
        let mut timer = SimTimer::new();
        timer.set_compare(5);
        timer.advance(10);
        assert!(timer.is_pending());

        timer.set_compare(1_000);
        timer.clear_pending();
        timer.enable_compare_interrupt();
        assert!(!timer.take_expiry());
    }

    #[test]
    fn crossing_the_compare_point_latches_once() {
        let mut timer = SimTimer::new();
        timer.set_compare(100);
        timer.clear_pending();
        timer.enable_compare_interrupt();

        timer.advance(99);
        assert!(!timer.take_expiry());
        timer.advance(1);
        assert!(timer.take_expiry());
        assert!(!timer.take_expiry());
    }

    #[test]
    fn overdue_compare_relatches_on_write() {
        let mut timer = SimTimer::new();
        timer.set_compare(100);
        timer.clear_pending();
        timer.enable_compare_interrupt();

        timer.advance(250);
        assert!(timer.take_expiry());
        timer.set_compare(200);
        assert!(timer.take_expiry());
        timer.set_compare(300);
        assert!(!timer.take_expiry());
    }

    #[test]
    fn disabled_interrupt_keeps_event_latched() {
        let mut timer = SimTimer::new();
        timer.set_compare(5);
        timer.clear_pending();
        timer.advance(5);
        assert!(!timer.take_expiry());
        assert!(timer.is_pending());

        timer.enable_compare_interrupt();
        assert!(timer.take_expiry());
    }

    #[test]
    fn compare_more_than_half_the_range_ahead_waits_for_the_counter() {
        let period = 3_000_000_000u32;
        let mut timer = SimTimer::starting_at(1_000);
        timer.set_compare(1_000u32.wrapping_add(period));
        timer.clear_pending();
        timer.enable_compare_interrupt();

        timer.advance(1);
        assert!(!timer.take_expiry());
        timer.advance(period - 2);
        assert!(!timer.take_expiry());
        timer.advance(1);
        assert!(timer.take_expiry());
    }

    #[test]
    fn compare_at_the_counter_without_a_step_does_not_latch() {
        let mut timer = SimTimer::starting_at(42);
        timer.set_compare(42);
        assert!(!timer.is_pending());
    }
}
