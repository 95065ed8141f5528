//! Extended-range selection.
//!
//! Polled from the main loop, never from interrupt context. No debounce:
//! contact bounce just flickers the active period between the two valid
//! values for a few iterations, which only moves the readout between
//! ranges and never corrupts a measurement.

use embedded_hal::digital::v2::{InputPin, OutputPin};

use super::period::{SharedPeriod, TimerPeriod};

/// Extended range stretches the measurement window tenfold, shifting the
/// readout one decimal digit down for low-frequency inputs.
const EXTENDED_SCALE: i16 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RangeMode {
    Normal,
    Extended,
}

/// Reads the active-low range button and publishes the matching reload
/// value; the indicator LED mirrors the selection.
pub struct RangeSelector<BTN, LED> {
    button: BTN,
    indicator: LED,
    base: TimerPeriod,
}

impl<BTN, LED> RangeSelector<BTN, LED>
where
    BTN: InputPin,
    LED: OutputPin,
{
    pub fn new(button: BTN, mut indicator: LED, base: TimerPeriod) -> Self {
        let _ = indicator.set_low();
        RangeSelector {
            button,
            indicator,
            base,
        }
    }

    /// One non-blocking poll. Always stores a full valid reload value, so
    /// the overflow interrupt can never observe a half-applied range
    /// switch; restoring normal range writes the exact base value back,
    /// with no drift across repeated toggles.
    pub fn poll(&mut self, active: &SharedPeriod) -> RangeMode {
        if matches!(self.button.is_low(), Ok(true)) {
            active.set(self.base.scaled(EXTENDED_SCALE));
            let _ = self.indicator.set_high();
            RangeMode::Extended
        } else {
            active.set(self.base);
            let _ = self.indicator.set_low();
            RangeMode::Normal
        }
    }
}
