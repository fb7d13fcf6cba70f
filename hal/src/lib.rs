//! Hardware Abstraction Layer (HAL) for the systime tick core
//!
//! This crate provides the narrow, vendor-agnostic traits through which the
//! tick pipeline reaches the board: a compare timer and its clock, the
//! interrupt controller, and a bank of indicator outputs.

#![no_std]

pub mod error;
pub mod gpio;
pub mod interrupt;
pub mod timer;

// Re-export commonly used types
pub use error::{HalError, HalResult};
pub use gpio::{IndicatorBank, PinBank};
pub use interrupt::{InterruptController, InterruptPriority, IsrHandler};
pub use timer::{CompareTimer, TimerClock};
