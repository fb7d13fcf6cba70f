mod timekeeper;

use std::vec::Vec;

use systime_hal::{CompareTimer, IndicatorBank, TimerClock};

/// Register-level stand-in for a compare timer `BITS` wide.
#[derive(Debug, Default)]
pub(crate) struct MockTimer<const BITS: u32 = 32> {
    pub counter: u32,
    pub compare: u32,
    pub width: u32,
    pub pending: bool,
    pub irq_enabled: bool,
}

impl<const BITS: u32> MockTimer<BITS> {
    pub fn at(counter: u32) -> Self {
        Self {
            counter,
            pending: true,
            ..Self::default()
        }
    }
}

impl<const BITS: u32> CompareTimer for MockTimer<BITS> {
    const COMPARE_BITS: u32 = BITS;

    fn counter(&self) -> u32 {
        self.counter
    }

    fn compare(&self) -> u32 {
        self.compare
    }

    fn set_compare(&mut self, value: u32) {
        self.compare = value;
    }

    fn set_compare_width(&mut self, bits: u32) {
        self.width = bits;
    }

    fn clear_pending(&mut self) {
        self.pending = false;
    }

    fn enable_compare_interrupt(&mut self) {
        self.irq_enabled = true;
    }

    fn disable_compare_interrupt(&mut self) {
        self.irq_enabled = false;
    }
}

pub(crate) struct FixedClock(pub u32);

impl TimerClock for FixedClock {
    fn timer_clock_hz(&self) -> u32 {
        self.0
    }
}

/// Indicator bank that remembers every toggle.
#[derive(Debug, Default)]
pub(crate) struct ToggleLog {
    pub toggles: Vec<usize>,
}

impl ToggleLog {
    pub fn count(&self, index: usize) -> usize {
        self.toggles.iter().filter(|&&i| i == index).count()
    }
}

impl IndicatorBank for ToggleLog {
    fn toggle_indicator(&mut self, index: usize) {
        self.toggles.push(index);
    }
}
