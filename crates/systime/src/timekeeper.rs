//! Foreground tick dispatch.
//!
//! [`Timekeeper`] is the consumer side of the pipeline: it polls the
//! [`TickSignal`], keeps the history, drives the indicators and advances the
//! [`ClockState`]. It never blocks and must not be called from interrupt
//! context.

use core::num::NonZeroU32;

use systime_hal::IndicatorBank;

use crate::clock::{ClockEvent, ClockEvents, ClockState};
use crate::config::TickConfig;
use crate::error::TickResult;
use crate::history::{TickHistory, DEFAULT_HISTORY_LEN};
use crate::signal::{TickSignal, TICK_INDEX_MAX};

/// Toggled on every consumed tick.
pub const TICK_INDICATOR: usize = 0;
/// Toggled every clock second.
pub const SECOND_INDICATOR: usize = 1;
/// Toggled every clock minute.
pub const MINUTE_INDICATOR: usize = 2;
/// Toggled every clock hour.
pub const HOUR_INDICATOR: usize = 3;

/// Indicator driven by a clock event.
pub const fn indicator_for(event: ClockEvent) -> usize {
    match event {
        ClockEvent::SecondElapsed => SECOND_INDICATOR,
        ClockEvent::MinuteRollover => MINUTE_INDICATOR,
        ClockEvent::HourRollover => HOUR_INDICATOR,
    }
}

/// Running totals kept by the foreground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks taken from the mailbox.
    pub consumed: u32,
    /// Expiries folded into a later tick because the foreground was late.
    pub coalesced: u32,
}

/// Outcome of one successful [`Timekeeper::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick_index: u32,
    /// Expiries between the previous consumed tick and this one.
    pub coalesced: u32,
    /// Clock events fired by this tick; empty unless a second elapsed.
    pub events: ClockEvents,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickReport {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "tick {} (+{} coalesced) {}",
            self.tick_index,
            self.coalesced,
            self.events.as_slice()
        );
    }
}

/// Foreground consumer of the tick mailbox.
pub struct Timekeeper<'a, S, const N: usize = DEFAULT_HISTORY_LEN> {
    signal: &'a TickSignal,
    ticks_per_second: NonZeroU32,
    history: TickHistory<N>,
    clock: ClockState,
    sink: S,
    stats: TickStats,
    last_index: u32,
}

impl<'a, S: IndicatorBank, const N: usize> Timekeeper<'a, S, N> {
    /// Creates a timekeeper starting at midnight.
    ///
    /// Coalescing is counted from the mailbox's current tick index.
    pub fn new(signal: &'a TickSignal, ticks_per_second: NonZeroU32, sink: S) -> Self {
        Self {
            signal,
            ticks_per_second,
            history: TickHistory::new(),
            clock: ClockState::MIDNIGHT,
            sink,
            stats: TickStats::default(),
            last_index: signal.tick_index(),
        }
    }

    /// Creates a timekeeper counting `config.rate_hz` ticks per second.
    pub fn from_config(signal: &'a TickSignal, config: &TickConfig, sink: S) -> TickResult<Self> {
        Ok(Self::new(signal, config.ticks_per_second()?, sink))
    }

    /// Starts the clock at `clock` instead of midnight.
    pub fn with_clock(mut self, clock: ClockState) -> Self {
        self.clock = clock;
        self
    }

    /// Consumes at most one pending tick.
    ///
    /// Returns `None` immediately when nothing is pending. Only ticks whose
    /// index is a multiple of the ticks-per-second rate advance the clock, so
    /// a coalesced multiple skips that second.
    pub fn poll(&mut self) -> Option<TickReport> {
        let tick_index = self.signal.try_consume()?;

        let gap = tick_index.wrapping_sub(self.last_index) & TICK_INDEX_MAX;
        let coalesced = gap.saturating_sub(1);
        self.last_index = tick_index;
        self.stats.consumed = self.stats.consumed.wrapping_add(1);
        if coalesced > 0 {
            self.stats.coalesced = self.stats.coalesced.wrapping_add(coalesced);
            log::warn!("{} tick(s) coalesced before tick {}", coalesced, tick_index);
        }

        self.history.record(tick_index);
        self.sink.toggle_indicator(TICK_INDICATOR);

        let events = if tick_index % self.ticks_per_second.get() == 0 {
            self.advance_clock()
        } else {
            ClockEvents::new()
        };

        log::trace!("tick {} at {}", tick_index, self.clock);
        Some(TickReport {
            tick_index,
            coalesced,
            events,
        })
    }

    fn advance_clock(&mut self) -> ClockEvents {
        let events = self.clock.advance();
        for &event in &events {
            self.sink.toggle_indicator(indicator_for(event));
            match event {
                ClockEvent::SecondElapsed => {}
                ClockEvent::MinuteRollover => log::info!("minute rollover, clock {}", self.clock),
                ClockEvent::HourRollover => log::info!("hour rollover, clock {}", self.clock),
            }
        }
        events
    }

    /// Polls forever, spinning while no tick is pending.
    pub fn run(&mut self) -> ! {
        loop {
            if self.poll().is_none() {
                core::hint::spin_loop();
            }
        }
    }

    /// Polls until `done` accepts a report, returning that report.
    pub fn run_until(&mut self, mut done: impl FnMut(&TickReport) -> bool) -> TickReport {
        loop {
            match self.poll() {
                Some(report) if done(&report) => return report,
                Some(_) => {}
                None => core::hint::spin_loop(),
            }
        }
    }

    pub fn clock(&self) -> ClockState {
        self.clock
    }

    pub fn history(&self) -> &TickHistory<N> {
        &self.history
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn ticks_per_second(&self) -> NonZeroU32 {
        self.ticks_per_second
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Hands the indicator bank back.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
