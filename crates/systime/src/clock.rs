//! Software wall clock advanced once per elapsed second.

use core::fmt;

pub const SECONDS_PER_MINUTE: u8 = 60;
pub const MINUTES_PER_HOUR: u8 = 60;
pub const HOURS_PER_DAY: u8 = 24;

/// Event produced by one step of the clock cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// A second elapsed (every advance).
    SecondElapsed,
    /// Seconds wrapped to zero and minutes advanced.
    MinuteRollover,
    /// Minutes wrapped to zero and hours advanced.
    HourRollover,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::SecondElapsed => defmt::write!(fmt, "SecondElapsed"),
            Self::MinuteRollover => defmt::write!(fmt, "MinuteRollover"),
            Self::HourRollover => defmt::write!(fmt, "HourRollover"),
        }
    }
}

/// Events fired by a single [`ClockState::advance`], in cascade order.
pub type ClockEvents = heapless::Vec<ClockEvent, 3>;

const CASCADE: [ClockEvent; 3] = [
    ClockEvent::SecondElapsed,
    ClockEvent::MinuteRollover,
    ClockEvent::HourRollover,
];

/// Hours, minutes and seconds since the clock started, wrapping every 24h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockState {
    // Field order gives chronological `Ord`.
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl ClockState {
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Builds a clock reading; `None` if any unit is out of range.
    pub const fn from_hms(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours >= HOURS_PER_DAY || minutes >= MINUTES_PER_HOUR || seconds >= SECONDS_PER_MINUTE {
            return None;
        }
        Some(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub const fn hours(&self) -> u8 {
        self.hours
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Seconds since midnight.
    pub const fn seconds_of_day(&self) -> u32 {
        (self.hours as u32 * MINUTES_PER_HOUR as u32 + self.minutes as u32)
            * SECONDS_PER_MINUTE as u32
            + self.seconds as u32
    }

    /// Advances the clock by one second and reports what rolled over.
    ///
    /// The returned events always start with [`ClockEvent::SecondElapsed`].
    /// Wrapping from 23:59:59 to 00:00:00 reports both rollovers and nothing
    /// more; days are not tracked.
    pub fn advance(&mut self) -> ClockEvents {
        let fired = self.cascade();
        CASCADE[..fired].iter().copied().collect()
    }

    fn cascade(&mut self) -> usize {
        self.seconds += 1;
        if self.seconds != SECONDS_PER_MINUTE {
            return 1;
        }
        self.seconds = 0;

        self.minutes += 1;
        if self.minutes != MINUTES_PER_HOUR {
            return 2;
        }
        self.minutes = 0;

        self.hours += 1;
        if self.hours == HOURS_PER_DAY {
            self.hours = 0;
        }
        3
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{=u8}:{=u8}:{=u8}",
            self.hours,
            self.minutes,
            self.seconds
        );
    }
}
