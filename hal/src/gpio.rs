//! Indicator outputs (LEDs) driven by the foreground loop

use embedded_hal::digital::StatefulOutputPin;

/// Bank of indicator outputs addressed by index.
///
/// Toggling is treated as infallible by callers; implementations swallow or
/// report their own failures.
pub trait IndicatorBank {
    /// Invert the state of indicator `index`. Unknown indices are ignored.
    fn toggle_indicator(&mut self, index: usize);
}

impl<B: IndicatorBank + ?Sized> IndicatorBank for &mut B {
    fn toggle_indicator(&mut self, index: usize) {
        (**self).toggle_indicator(index);
    }
}

/// [`IndicatorBank`] over an array of `embedded-hal` output pins.
pub struct PinBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: StatefulOutputPin, const N: usize> PinBank<P, N> {
    /// Wraps `pins`; indicator `i` is `pins[i]`.
    pub const fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    /// Gives the pins back.
    pub fn release(self) -> [P; N] {
        self.pins
    }

    /// Reads back whether indicator `index` is currently driven high.
    pub fn is_set(&mut self, index: usize) -> Option<bool> {
        self.pins.get_mut(index)?.is_set_high().ok()
    }
}

impl<P: StatefulOutputPin, const N: usize> IndicatorBank for PinBank<P, N> {
    fn toggle_indicator(&mut self, index: usize) {
        if let Some(pin) = self.pins.get_mut(index) {
            // Pin errors have nowhere to go from the foreground loop.
            let _ = pin.toggle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorType, OutputPin};

    #[derive(Default)]
    struct FakePin {
        high: bool,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for FakePin {
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    #[test]
    fn toggle_flips_only_the_addressed_pin() {
        let mut bank = PinBank::new([FakePin::default(), FakePin::default()]);

        bank.toggle_indicator(1);
        assert_eq!(bank.is_set(0), Some(false));
        assert_eq!(bank.is_set(1), Some(true));

        bank.toggle_indicator(1);
        assert_eq!(bank.is_set(1), Some(false));
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut bank = PinBank::new([FakePin::default()]);
        bank.toggle_indicator(7);
        assert_eq!(bank.is_set(0), Some(false));
        assert_eq!(bank.is_set(7), None);
    }
}
