//! Compare timer abstraction

/// Provides the input clock of the system timer.
pub trait TimerClock {
    /// Timer input clock in hertz.
    fn timer_clock_hz(&self) -> u32;
}

/// Free-running up-counter with a single compare channel.
///
/// The compare event fires when the counter reaches the compare value. The
/// counter and compare registers are `COMPARE_BITS` wide and wrap silently.
pub trait CompareTimer {
    /// Number of significant bits used by the compare match.
    const COMPARE_BITS: u32 = 32;

    /// Current counter value
    fn counter(&self) -> u32;

    /// Current compare value
    fn compare(&self) -> u32;

    /// Program the compare value
    fn set_compare(&mut self, value: u32);

    /// Select how many low bits of the counter take part in the compare match
    fn set_compare_width(&mut self, bits: u32);

    /// Clear a latched compare event
    fn clear_pending(&mut self);

    /// Enable the compare interrupt request
    fn enable_compare_interrupt(&mut self);

    /// Disable the compare interrupt request
    fn disable_compare_interrupt(&mut self);

    /// Mask selecting the valid bits of the compare register.
    fn compare_mask() -> u32 {
        if Self::COMPARE_BITS >= 32 {
            u32::MAX
        } else {
            (1u32 << Self::COMPARE_BITS) - 1
        }
    }
}

impl<C: TimerClock + ?Sized> TimerClock for &C {
    fn timer_clock_hz(&self) -> u32 {
        (**self).timer_clock_hz()
    }
}
