//! Configuration-time errors of the tick pipeline.
//!
//! Nothing on the interrupt path is fallible; every variant here is raised
//! while bringing the tick source up from the foreground.

use systime_hal::HalError;
use thiserror::Error;

/// Errors reported while configuring or starting the tick source.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickError {
    #[error("tick rate must be non-zero")]
    ZeroRate,
    #[error("tick rate {rate_hz} Hz exceeds the {clock_hz} Hz timer clock")]
    RateAboveClock { clock_hz: u32, rate_hz: u32 },
    #[error("rearm period of {period} timer units does not fit a {bits}-bit compare register")]
    PeriodOverflow { period: u32, bits: u32 },
    #[error("no tick source has been placed in the shared cell")]
    NotInitialised,
    #[error("interrupt controller: {0}")]
    Interrupt(#[from] HalError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ZeroRate => defmt::write!(fmt, "ZeroRate"),
            Self::RateAboveClock { clock_hz, rate_hz } => {
                defmt::write!(fmt, "RateAboveClock({} Hz > {} Hz)", rate_hz, clock_hz)
            }
            Self::PeriodOverflow { period, bits } => {
                defmt::write!(fmt, "PeriodOverflow({} in {} bits)", period, bits)
            }
            Self::NotInitialised => defmt::write!(fmt, "NotInitialised"),
            Self::Interrupt(err) => defmt::write!(fmt, "Interrupt({})", err),
        }
    }
}

/// Result type used throughout the tick pipeline
pub type TickResult<T> = Result<T, TickError>;
