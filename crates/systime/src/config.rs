//! Tick pipeline configuration.

use core::num::NonZeroU32;

use systime_hal::InterruptPriority;

use crate::error::{TickError, TickResult};

/// Default tick rate in hertz.
pub const DEFAULT_RATE_HZ: u32 = 10;
/// Default priority of the compare interrupt.
pub const DEFAULT_PRIORITY: InterruptPriority = 2;

/// Rate and interrupt routing of the tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickConfig {
    /// Timer expiries per second; also the number of ticks per clock second.
    pub rate_hz: u32,
    /// Interrupt source id of the compare event.
    pub irq: u32,
    /// Priority the handler is installed at.
    pub priority: InterruptPriority,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            rate_hz: DEFAULT_RATE_HZ,
            irq: 0,
            priority: DEFAULT_PRIORITY,
        }
    }
}

impl TickConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> TickConfigBuilder {
        TickConfigBuilder::default()
    }

    /// Ticks making up one clock second.
    pub fn ticks_per_second(&self) -> TickResult<NonZeroU32> {
        NonZeroU32::new(self.rate_hz).ok_or(TickError::ZeroRate)
    }
}

/// Builder for [`TickConfig`].
#[derive(Debug, Clone, Default)]
pub struct TickConfigBuilder {
    config: TickConfig,
}

impl TickConfigBuilder {
    /// Sets the tick rate.
    pub fn rate_hz(mut self, rate_hz: u32) -> Self {
        self.config.rate_hz = rate_hz;
        self
    }

    /// Sets the interrupt source id.
    pub fn irq(mut self, irq: u32) -> Self {
        self.config.irq = irq;
        self
    }

    /// Sets the interrupt priority.
    pub fn priority(mut self, priority: InterruptPriority) -> Self {
        self.config.priority = priority;
        self
    }

    pub fn build(self) -> TickConfig {
        self.config
    }
}
