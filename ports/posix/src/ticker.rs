//! Wall-clock driver for the simulated timer.
//!
//! A dedicated thread advances the [`SimTimer`] counter in step with the
//! monotonic clock and raises the compare interrupt whenever it latches.
//! Deadlines are absolute, so a late wakeup does not shift later ones.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::{service_expiries, SimInterrupts, SimTimer};

/// Wall time between counter updates.
pub const TICKER_SLICE: Duration = Duration::from_millis(1);

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Largest single counter step. A step of a full counter turn or more would
/// hide compare crossings.
const MAX_STEP: u128 = u32::MAX as u128;

/// Running ticker thread. Stops and joins on drop.
pub struct Ticker {
    running: Arc<AtomicBool>,
    raised: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Starts driving `timer` at `clock_hz` times `speedup`, raising `irq` on
    /// `interrupts` for every compare match.
    pub fn spawn(
        timer: SimTimer,
        interrupts: SimInterrupts,
        irq: u32,
        clock_hz: u32,
        speedup: u32,
    ) -> io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let raised = Arc::new(AtomicU64::new(0));
        let units_per_sec = u128::from(clock_hz) * u128::from(speedup.max(1));

        let handle = thread::Builder::new().name("stm-ticker".into()).spawn({
            let running = Arc::clone(&running);
            let raised = Arc::clone(&raised);
            move || {
                let start = Instant::now();
                let mut next = start;
                let mut emitted: u128 = 0;

                while running.load(Ordering::Relaxed) {
                    next += TICKER_SLICE;
                    let now = Instant::now();
                    if next > now {
                        thread::sleep(next - now);
                    }

                    let due = start.elapsed().as_nanos() * units_per_sec / NANOS_PER_SEC;
                    let mut remaining = due.saturating_sub(emitted);
                    emitted = emitted.max(due);
                    while remaining > 0 {
                        let step = remaining.min(MAX_STEP);
                        remaining -= step;
                        timer.advance(step as u32);
                        let count = service_expiries(&timer, &interrupts, irq);
                        raised.fetch_add(u64::from(count), Ordering::Relaxed);
                    }
                }
                log::debug!("ticker stopped after {} interrupts", raised.load(Ordering::Relaxed));
            }
        })?;

        log::debug!("ticker started at {} timer units/s", units_per_sec);
        Ok(Self {
            running,
            raised,
            handle: Some(handle),
        })
    }

    /// Compare interrupts raised so far.
    pub fn raised(&self) -> u64 {
        self.raised.load(Ordering::Relaxed)
    }

    /// Stops the thread and waits for it to exit.
    pub fn stop(mut self) -> u64 {
        self.shutdown();
        self.raised()
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
