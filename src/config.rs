//! Build-time configuration for the frequency meter.
//!
//! Three constants define the whole timebase. They must satisfy the
//! divisibility rules in [`TimerPeriod::derive`]; an illegal combination
//! fails the build when `BASE_PERIOD` is evaluated.

use crate::hal::timer::Prescaler;
use crate::meter::period::TimerPeriod;

/// Crystal clock in Hz. Whole MHz, at least 4 MHz; 12, 16 and 20 MHz
/// recommended.
pub const REFERENCE_CLOCK_HZ: u32 = 12_000_000;

/// Input frequency that lights the counter's top output bit, in Hz.
/// Powers of two suit the counter chip: 3.2 or 6.4 MHz for two-digit
/// math, 5.12 MHz for three-digit math.
pub const FULL_SCALE_INPUT_HZ: u32 = 6_400_000;

/// Prescaler for the window timebase.
pub const TIMER_PRESCALER: Prescaler = Prescaler::Div64;

/// Base window reload value, computed once at compile time. Wrong timing
/// constants make every measurement meaningless, so the firmware must
/// never come up with them; const evaluation turns that halt into a
/// build error.
pub const BASE_PERIOD: TimerPeriod =
    match TimerPeriod::derive(REFERENCE_CLOCK_HZ, FULL_SCALE_INPUT_HZ, TIMER_PRESCALER) {
        Ok(period) => period,
        Err(_) => panic!(
            "invalid timebase: REFERENCE_CLOCK_HZ / FULL_SCALE_INPUT_HZ / TIMER_PRESCALER \
             violate the divisibility or range rules"
        ),
    };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_configuration_is_legal() {
        assert_eq!(BASE_PERIOD.value(), -15);
    }
}
