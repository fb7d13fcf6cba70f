use core::num::NonZeroU32;

use super::ToggleLog;
use crate::clock::{ClockEvent, ClockState};
use crate::config::TickConfig;
use crate::error::TickError;
use crate::signal::{TickSignal, TICK_INDEX_MAX};
use crate::timekeeper::{
    Timekeeper, HOUR_INDICATOR, MINUTE_INDICATOR, SECOND_INDICATOR, TICK_INDICATOR,
};

fn tps(rate: u32) -> NonZeroU32 {
    NonZeroU32::new(rate).unwrap()
}

/// Signals and consumes one tick at a time, as an on-time foreground would.
fn feed(keeper: &mut Timekeeper<'_, ToggleLog>, signal: &TickSignal, ticks: u32) {
    for _ in 0..ticks {
        signal.signal();
        assert!(keeper.poll().is_some());
    }
}

#[test]
fn poll_without_pending_tick_returns_none() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(10), ToggleLog::default());
    assert!(keeper.poll().is_none());
    assert!(keeper.sink().toggles.is_empty());
}

#[test]
fn every_tick_toggles_tick_indicator_and_is_recorded() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(10), ToggleLog::default());

    feed(&mut keeper, &signal, 3);

    assert_eq!(keeper.sink().toggles, [TICK_INDICATOR; 3]);
    assert_eq!(keeper.history().get(3), Some(3));
    assert_eq!(keeper.clock(), ClockState::MIDNIGHT);
    assert_eq!(keeper.stats().consumed, 3);
}

#[test]
fn multiple_of_rate_advances_clock() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(10), ToggleLog::default());

    feed(&mut keeper, &signal, 9);
    signal.signal();
    let report = keeper.poll().unwrap();

    assert_eq!(report.tick_index, 10);
    assert_eq!(report.events.as_slice(), &[ClockEvent::SecondElapsed]);
    assert_eq!(keeper.clock().seconds(), 1);
    assert_eq!(keeper.sink().count(SECOND_INDICATOR), 1);
}

#[test]
fn one_minute_of_ticks_advances_minutes() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(10), ToggleLog::default());

    feed(&mut keeper, &signal, 10 * 60);

    assert_eq!(keeper.clock(), ClockState::from_hms(0, 1, 0).unwrap());
    assert_eq!(keeper.sink().count(TICK_INDICATOR), 600);
    assert_eq!(keeper.sink().count(SECOND_INDICATOR), 60);
    assert_eq!(keeper.sink().count(MINUTE_INDICATOR), 1);
    assert_eq!(keeper.sink().count(HOUR_INDICATOR), 0);
}

#[test]
fn one_day_of_ticks_returns_to_midnight() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(2), ToggleLog::default());

    feed(&mut keeper, &signal, 2 * 60 * 60 * 24);

    assert_eq!(keeper.clock(), ClockState::MIDNIGHT);
    assert_eq!(keeper.sink().count(MINUTE_INDICATOR), 1440);
    assert_eq!(keeper.sink().count(HOUR_INDICATOR), 24);
}

#[test]
fn last_second_of_day_toggles_minute_and_hour_together() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> =
        Timekeeper::new(&signal, tps(1), ToggleLog::default())
            .with_clock(ClockState::from_hms(23, 59, 59).unwrap());

    signal.signal();
    let report = keeper.poll().unwrap();

    assert_eq!(keeper.clock(), ClockState::MIDNIGHT);
    assert_eq!(
        keeper.sink().toggles,
        [TICK_INDICATOR, SECOND_INDICATOR, MINUTE_INDICATOR, HOUR_INDICATOR]
    );
    assert_eq!(report.events.len(), 3);
}

#[test]
fn late_foreground_counts_coalesced_ticks() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(10), ToggleLog::default());

    signal.signal();
    keeper.poll().unwrap();
    for _ in 0..4 {
        signal.signal();
    }
    let report = keeper.poll().unwrap();

    assert_eq!(report.tick_index, 5);
    assert_eq!(report.coalesced, 3);
    assert_eq!(keeper.stats().consumed, 2);
    assert_eq!(keeper.stats().coalesced, 3);
    assert!(keeper.poll().is_none());
}

#[test]
fn ticks_raised_before_first_poll_are_coalesced() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(10), ToggleLog::default());

    for _ in 0..3 {
        signal.signal();
    }
    let report = keeper.poll().unwrap();

    assert_eq!(report.tick_index, 3);
    assert_eq!(report.coalesced, 2);
    assert_eq!(keeper.history().get(3), Some(3));
}

#[test]
fn tick_index_wrap_is_not_coalescing() {
    let signal = TickSignal::starting_at(TICK_INDEX_MAX - 1);
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(10), ToggleLog::default());

    signal.signal();
    let report = keeper.poll().unwrap();
    assert_eq!(report.tick_index, TICK_INDEX_MAX);
    assert_eq!(report.coalesced, 0);
    assert!(report.events.is_empty());

    signal.signal();
    let report = keeper.poll().unwrap();
    assert_eq!(report.tick_index, 0);
    assert_eq!(report.coalesced, 0);
    assert_eq!(report.events.as_slice(), &[ClockEvent::SecondElapsed]);
    assert_eq!(keeper.clock(), ClockState::from_hms(0, 0, 1).unwrap());
    assert_eq!(keeper.stats().coalesced, 0);
}

#[test]
fn coalesced_second_boundary_skips_that_second() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(10), ToggleLog::default());

    feed(&mut keeper, &signal, 9);
    signal.signal();
    signal.signal();
    let report = keeper.poll().unwrap();

    assert_eq!(report.tick_index, 11);
    assert!(report.events.is_empty());
    assert_eq!(keeper.clock(), ClockState::MIDNIGHT);
}

#[test]
fn run_until_stops_on_matching_report() {
    let signal = TickSignal::new();
    let mut keeper: Timekeeper<'_, ToggleLog> = Timekeeper::new(&signal, tps(4), ToggleLog::default());

    signal.signal();
    let report = keeper.run_until(|report| report.tick_index == 1);
    assert_eq!(report.tick_index, 1);
}

#[test]
fn from_config_rejects_zero_rate() {
    let signal = TickSignal::new();
    let config = TickConfig::builder().rate_hz(0).build();
    let keeper: Result<Timekeeper<'_, ToggleLog>, _> =
        Timekeeper::from_config(&signal, &config, ToggleLog::default());
    assert_eq!(keeper.err(), Some(TickError::ZeroRate));

    let keeper: Timekeeper<'_, ToggleLog> =
        Timekeeper::from_config(&signal, &TickConfig::default(), ToggleLog::default()).unwrap();
    assert_eq!(keeper.ticks_per_second().get(), 10);
}
