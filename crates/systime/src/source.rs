//! Periodic tick source on top of a compare timer.
//!
//! The compare register is advanced by a fixed period on every expiry rather
//! than set to `counter + period`, so interrupt latency shifts individual
//! ticks but never accumulates into the long-run rate.

use core::cell::RefCell;
use core::num::NonZeroU32;

use critical_section::Mutex;
use systime_hal::{CompareTimer, TimerClock};

use crate::error::{TickError, TickResult};

/// Callback run from interrupt context on every expiry.
pub type TickCallback = fn();

/// Computes the rearm period for `rate_hz` from a `clock_hz` timer clock.
///
/// The period must be non-zero and fit a `compare_bits` wide register.
pub fn reload_period(clock_hz: u32, rate_hz: u32, compare_bits: u32) -> TickResult<NonZeroU32> {
    if rate_hz == 0 {
        return Err(TickError::ZeroRate);
    }
    let period =
        NonZeroU32::new(clock_hz / rate_hz).ok_or(TickError::RateAboveClock { clock_hz, rate_hz })?;

    let limit = (1u64 << compare_bits.min(32)) - 1;
    if u64::from(period.get()) > limit {
        return Err(TickError::PeriodOverflow {
            period: period.get(),
            bits: compare_bits,
        });
    }
    Ok(period)
}

/// Owner of the hardware compare timer and the single tick callback slot.
pub struct TickSource<T> {
    timer: T,
    period: Option<NonZeroU32>,
    callback: Option<TickCallback>,
}

impl<T: CompareTimer> TickSource<T> {
    /// Wraps `timer`; nothing is programmed until [`configure`](Self::configure).
    pub const fn new(timer: T) -> Self {
        Self {
            timer,
            period: None,
            callback: None,
        }
    }

    /// Programs the timer to expire `rate_hz` times per second.
    ///
    /// Arms the first compare point one period from now, clears any stale
    /// compare event and enables the compare interrupt. Returns the period in
    /// timer units.
    pub fn configure<C: TimerClock + ?Sized>(&mut self, clock: &C, rate_hz: u32) -> TickResult<u32> {
        let clock_hz = clock.timer_clock_hz();
        let period = reload_period(clock_hz, rate_hz, T::COMPARE_BITS)?;
        self.period = Some(period);

        let first = self.timer.counter().wrapping_add(period.get()) & T::compare_mask();
        self.timer.set_compare(first);
        self.timer.set_compare_width(T::COMPARE_BITS);
        self.timer.clear_pending();
        self.timer.enable_compare_interrupt();

        log::debug!(
            "tick source: {} Hz from {} Hz clock, period {} units, first compare {:#010x}",
            rate_hz,
            clock_hz,
            period,
            first
        );
        Ok(period.get())
    }

    /// Installs `callback`, replacing any previous one.
    pub fn install_callback(&mut self, callback: TickCallback) {
        self.callback = Some(callback);
    }

    /// Empties the callback slot, returning what was installed.
    pub fn remove_callback(&mut self) -> Option<TickCallback> {
        self.callback.take()
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Expiry handler body; call from the compare interrupt.
    ///
    /// Advances the compare point by exactly one period, then runs the
    /// callback. Constant time.
    pub fn on_expiry(&mut self) {
        if let Some(period) = self.period {
            let next = self.timer.compare().wrapping_add(period.get()) & T::compare_mask();
            self.timer.set_compare(next);
        }
        if let Some(callback) = self.callback {
            callback();
        }
    }

    /// Rearm period in timer units, once configured.
    pub fn period(&self) -> Option<u32> {
        self.period.map(NonZeroU32::get)
    }

    /// Timer units elapsed since the most recent expiry point.
    ///
    /// Exceeds the period while an expiry is waiting to be serviced.
    pub fn subticks(&self) -> Option<u32> {
        let period = self.period?.get();
        let since_compare = self.timer.counter().wrapping_sub(self.timer.compare());
        Some(since_compare.wrapping_add(period) & T::compare_mask())
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Disables the compare interrupt and hands the timer back.
    pub fn release(mut self) -> T {
        self.timer.disable_compare_interrupt();
        self.timer
    }
}

/// Interrupt-safe home for a [`TickSource`], suitable for a `static`.
///
/// The foreground configures the source and swaps callbacks through it while
/// the interrupt handler calls [`on_interrupt`](Self::on_interrupt).
pub struct SharedTickSource<T> {
    inner: Mutex<RefCell<Option<TickSource<T>>>>,
}

impl<T> SharedTickSource<T> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Places `source` in the cell, returning the previous occupant.
    pub fn init(&self, source: TickSource<T>) -> Option<TickSource<T>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(source))
    }

    /// Runs `f` on the source inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut TickSource<T>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<T: CompareTimer> SharedTickSource<T> {
    /// Installs `callback` on the shared source.
    pub fn install_callback(&self, callback: TickCallback) -> TickResult<()> {
        self.with(|source| source.install_callback(callback))
            .ok_or(TickError::NotInitialised)
    }

    /// Interrupt handler body. Does nothing while the cell is empty.
    pub fn on_interrupt(&self) {
        self.with(|source| source.on_expiry());
    }
}

impl<T> Default for SharedTickSource<T> {
    fn default() -> Self {
        Self::new()
    }
}
