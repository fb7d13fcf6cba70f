//! Console stand-in for the indicator LEDs.

use systime::{HOUR_INDICATOR, MINUTE_INDICATOR, SECOND_INDICATOR, TICK_INDICATOR};
use systime_hal::IndicatorBank;

/// Number of indicators the timekeeper drives.
pub const INDICATOR_COUNT: usize = 4;

const NAMES: [&str; INDICATOR_COUNT] = ["tick", "second", "minute", "hour"];

/// Keeps the on/off state and toggle count of each indicator and logs changes.
///
/// The tick indicator changes far too often to be useful at `info`, so it is
/// logged at `trace` and the others at `debug`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleIndicators {
    states: [bool; INDICATOR_COUNT],
    toggles: [u64; INDICATOR_COUNT],
}

impl ConsoleIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self, index: usize) -> bool {
        self.states.get(index).copied().unwrap_or(false)
    }

    /// Times indicator `index` has been toggled.
    pub fn toggles(&self, index: usize) -> u64 {
        self.toggles.get(index).copied().unwrap_or(0)
    }

    /// One character per indicator, `*` for on and `.` for off.
    pub fn render(&self) -> String {
        self.states
            .iter()
            .map(|&on| if on { '*' } else { '.' })
            .collect()
    }
}

impl IndicatorBank for ConsoleIndicators {
    fn toggle_indicator(&mut self, index: usize) {
        let Some(state) = self.states.get_mut(index) else {
            return;
        };
        *state = !*state;
        self.toggles[index] += 1;

        let name = NAMES[index];
        match index {
            TICK_INDICATOR => log::trace!("{} led {}", name, on_off(*state)),
            SECOND_INDICATOR | MINUTE_INDICATOR | HOUR_INDICATOR => {
                log::debug!("{} led {}", name, on_off(*state))
            }
            _ => {}
        }
    }
}

fn on_off(state: bool) -> &'static str {
    if state {
        "on"
    } else {
        "off"
    }
}
