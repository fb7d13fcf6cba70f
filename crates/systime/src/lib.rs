#![no_std]

//! # systime
//!
//! Interrupt-driven periodic tick for single-core embedded targets, with a
//! software wall clock advanced from the foreground.
//!
//! ## Module Overview
//! - [`source`]     – compare-timer programming and drift-free rearm.
//! - [`signal`]     – single-slot atomic mailbox from interrupt to foreground.
//! - [`history`]    – fixed-capacity record of recent tick indices.
//! - [`clock`]      – seconds/minutes/hours cascade.
//! - [`timekeeper`] – foreground loop tying the above to indicator outputs.
//! - [`config`]     – rate and interrupt routing.
//!
//! The interrupt handler touches only the [`TickSource`] and the
//! [`TickSignal`]; everything else runs in the foreground.

#[cfg(test)]
extern crate std;

pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod signal;
pub mod source;
pub mod timekeeper;

pub use clock::{ClockEvent, ClockEvents, ClockState};
pub use config::{TickConfig, TickConfigBuilder};
pub use error::{TickError, TickResult};
pub use history::{TickHistory, DEFAULT_HISTORY_LEN};
pub use signal::{TickSignal, TICK_INDEX_MAX};
pub use source::{reload_period, SharedTickSource, TickCallback, TickSource};
pub use timekeeper::{
    indicator_for, TickReport, TickStats, Timekeeper, HOUR_INDICATOR, MINUTE_INDICATOR,
    SECOND_INDICATOR, TICK_INDICATOR,
};

use systime_hal::{CompareTimer, InterruptController, IsrHandler, TimerClock};

/// Brings the tick source in `cell` up according to `config`.
///
/// Configures the timer, installs `handler` at the configured priority with
/// the rearm period as its context argument, then enables the interrupt
/// source. `handler` is expected to call [`SharedTickSource::on_interrupt`]
/// on the same cell. Returns the rearm period.
pub fn start<T, C, I>(
    cell: &SharedTickSource<T>,
    clock: &C,
    interrupts: &mut I,
    config: &TickConfig,
    handler: IsrHandler,
) -> TickResult<u32>
where
    T: CompareTimer,
    C: TimerClock + ?Sized,
    I: InterruptController + ?Sized,
{
    let period = cell
        .with(|source| source.configure(clock, config.rate_hz))
        .ok_or(TickError::NotInitialised)??;

    interrupts.install(config.irq, handler, config.priority, period as usize)?;
    interrupts.enable_interrupt(config.irq)?;

    log::debug!(
        "tick interrupt {} installed at priority {}",
        config.irq,
        config.priority
    );
    Ok(period)
}

#[cfg(test)]
mod tests;
