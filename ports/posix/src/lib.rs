//! Host port for `systime`.
//!
//! Stands in for the target's system timer, interrupt controller and LEDs so
//! the tick pipeline can run and be tested on a POSIX machine. The
//! `critical-section` implementation comes from its `std` feature.

pub mod indicators;
pub mod interrupts;
pub mod logger;
pub mod ticker;
pub mod timer;

pub use indicators::{ConsoleIndicators, INDICATOR_COUNT};
pub use interrupts::{SimInterrupts, MAX_IRQ};
pub use logger::{init_logger, StdoutLogger};
pub use ticker::{Ticker, TICKER_SLICE};
pub use timer::{SimClock, SimTimer, DEFAULT_CLOCK_HZ};

/// Raises `irq` once per latched compare match on `timer`.
///
/// An expiry whose rearm is already overdue latches again, so this keeps
/// raising until the timer is caught up. Returns the number of handler runs.
pub fn service_expiries(timer: &SimTimer, interrupts: &SimInterrupts, irq: u32) -> u32 {
    let mut raised = 0;
    while timer.take_expiry() && interrupts.raise(irq) {
        raised += 1;
    }
    raised
}
