//! Window timebase derivation.
//!
//! The measurement window is half a period of the gate square wave. Its
//! width in timer ticks is fixed at build time from three constants: the
//! crystal clock, the input frequency that should light the counter's top
//! output bit, and the timer prescaler. All the arithmetic lives here; the
//! interrupt side only ever reloads the derived value.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::hal::timer::Prescaler;

/// Longest window, in timer ticks before the prescaler is applied. The
/// gate half-period must stay inside the timer's countable budget.
pub const MAX_WINDOW_TICKS: u32 = 25;

/// Full range of the 8-bit reload register, in ticks.
const TIMER_RANGE_TICKS: i16 = 256;

/// A rejected clock/full-scale/prescaler triple. There is no recovery:
/// wrong timing constants make every measurement meaningless, so the
/// firmware refuses to come up at all (the build fails when the
/// configuration constants are checked at compile time).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Reference clock below the 4 MHz floor.
    ReferenceClockTooSlow,
    /// Reference clock is not a whole number of MHz.
    ReferenceClockNotWholeMegahertz,
    /// One of the divisions in the window formula truncates, so the tick
    /// count would be silently rounded.
    NonIntegralWindow,
    /// Tick count is not an exact multiple of the prescaler divisor.
    NotDivisibleByPrescaler,
    /// Tick count after prescaling exceeds [`MAX_WINDOW_TICKS`].
    TooManyTicks,
}

/// Signed timer reload value: the negated number of ticks until the timer
/// overflows and fires. `-15` means the window is 15 prescaled ticks wide.
///
/// Held as `i16` so the 10x extended-range value (down to `-250`) stays
/// representable; [`TimerPeriod::reload_byte`] narrows to the two's
/// complement byte the 8-bit reload register actually takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerPeriod(i16);

impl TimerPeriod {
    /// Derive the base reload value, or reject the configuration.
    ///
    /// The window width before prescaling is
    /// `(reference_clock_hz / 1_000_000 / 4) * (1000 * 2048)
    ///  / (full_scale_input_hz / 1000)` ticks. Every division must be
    /// exact, the result must divide evenly by the prescaler, and the
    /// prescaled quotient must fit the timer budget.
    ///
    /// `const fn` so the firmware configuration can be checked at compile
    /// time (see `config::BASE_PERIOD`).
    pub const fn derive(
        reference_clock_hz: u32,
        full_scale_input_hz: u32,
        prescaler: Prescaler,
    ) -> Result<TimerPeriod, ConfigError> {
        if reference_clock_hz < 4_000_000 {
            return Err(ConfigError::ReferenceClockTooSlow);
        }
        if reference_clock_hz % 1_000_000 != 0 {
            return Err(ConfigError::ReferenceClockNotWholeMegahertz);
        }
        let clock_mhz = reference_clock_hz / 1_000_000;

        // Four clocks per instruction cycle.
        if clock_mhz % 4 != 0 {
            return Err(ConfigError::NonIntegralWindow);
        }
        let cycle_mhz = clock_mhz / 4;

        if full_scale_input_hz % 1000 != 0 {
            return Err(ConfigError::NonIntegralWindow);
        }
        let full_scale_khz = full_scale_input_hz / 1000;

        // 32-bit intermediate: up to 2048000 per instruction-clock MHz.
        let numerator = cycle_mhz * (1000 * 2048);
        if numerator % full_scale_khz != 0 {
            return Err(ConfigError::NonIntegralWindow);
        }
        let raw_ticks = numerator / full_scale_khz;

        if raw_ticks % prescaler.divisor() != 0 {
            return Err(ConfigError::NotDivisibleByPrescaler);
        }
        let ticks = raw_ticks / prescaler.divisor();
        if ticks > MAX_WINDOW_TICKS {
            return Err(ConfigError::TooManyTicks);
        }

        Ok(TimerPeriod(-(ticks as i16)))
    }

    /// The signed reload value.
    pub const fn value(self) -> i16 {
        self.0
    }

    /// Window width in prescaled timer ticks.
    pub const fn ticks(self) -> u16 {
        (-self.0) as u16
    }

    /// Two's complement byte for the 8-bit reload register. `-250`
    /// becomes `6`: the timer counts 250 ticks to overflow.
    pub const fn reload_byte(self) -> u8 {
        self.0 as u8
    }

    /// Stretch the window by an integer factor (extended range).
    ///
    /// Clamped at the full reload-register range of 256 ticks instead of
    /// wrapping. Unreachable for legal configurations (25 ticks x 10 =
    /// 250), but defined rather than inherited from integer truncation.
    pub const fn scaled(self, factor: i16) -> TimerPeriod {
        let ticks = -self.0 * factor;
        if ticks > TIMER_RANGE_TICKS {
            TimerPeriod(-TIMER_RANGE_TICKS)
        } else {
            TimerPeriod(-ticks)
        }
    }
}

/// The live reload value shared between the main loop and the overflow
/// interrupt: the Range Selector stores, the Gate/Reset Driver loads.
///
/// Held as the reload-register byte in an atomic cell so the handler can
/// never observe a torn update. Relaxed ordering is enough for a single
/// byte with one writer and one reader.
pub struct SharedPeriod(AtomicU8);

impl SharedPeriod {
    pub const fn new(period: TimerPeriod) -> Self {
        SharedPeriod(AtomicU8::new(period.reload_byte()))
    }

    pub fn set(&self, period: TimerPeriod) {
        self.0.store(period.reload_byte(), Ordering::Relaxed);
    }

    pub fn reload_byte(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(clock: u32, full_scale: u32, prescaler: Prescaler) -> Result<TimerPeriod, ConfigError> {
        TimerPeriod::derive(clock, full_scale, prescaler)
    }

    #[test]
    fn twelve_mhz_at_6_4_full_scale_gives_15_ticks() {
        let period = derive(12_000_000, 6_400_000, Prescaler::Div64).unwrap();
        assert_eq!(period.value(), -15);
        assert_eq!(period.ticks(), 15);
        assert_eq!(period.reload_byte(), 0xF1);
    }

    #[test]
    fn twelve_mhz_at_3_2_full_scale_gives_15_ticks() {
        let period = derive(12_000_000, 3_200_000, Prescaler::Div128).unwrap();
        assert_eq!(period.value(), -15);
    }

    #[test]
    fn twenty_mhz_hits_the_tick_budget_exactly() {
        // 25 ticks is the maximum legal window.
        let period = derive(20_000_000, 6_400_000, Prescaler::Div64).unwrap();
        assert_eq!(period.value(), -25);
    }

    #[test]
    fn fractional_prescaler_quotient_is_rejected_not_rounded() {
        // 1600 / 256 = 6.25
        assert_eq!(
            derive(20_000_000, 6_400_000, Prescaler::Div256),
            Err(ConfigError::NotDivisibleByPrescaler)
        );
    }

    #[test]
    fn slow_reference_clock_is_rejected() {
        assert_eq!(
            derive(3_999_999, 6_400_000, Prescaler::Div64),
            Err(ConfigError::ReferenceClockTooSlow)
        );
    }

    #[test]
    fn fractional_megahertz_clock_is_rejected() {
        assert_eq!(
            derive(4_500_000, 6_400_000, Prescaler::Div2),
            Err(ConfigError::ReferenceClockNotWholeMegahertz)
        );
    }

    #[test]
    fn clock_not_divisible_into_instruction_cycles_is_rejected() {
        // 6 MHz / 4 truncates.
        assert_eq!(
            derive(6_000_000, 6_400_000, Prescaler::Div2),
            Err(ConfigError::NonIntegralWindow)
        );
    }

    #[test]
    fn fractional_khz_full_scale_is_rejected() {
        assert_eq!(
            derive(12_000_000, 6_400_500, Prescaler::Div64),
            Err(ConfigError::NonIntegralWindow)
        );
    }

    #[test]
    fn oversized_window_is_rejected() {
        // 3200 / 64 = 50 ticks, double the budget.
        assert_eq!(
            derive(20_000_000, 3_200_000, Prescaler::Div64),
            Err(ConfigError::TooManyTicks)
        );
    }

    #[test]
    fn accepted_configurations_reconstruct_the_raw_tick_count() {
        // Sweep the recommended clocks and full-scale values against every
        // prescaler; whenever a combination is accepted, undoing the
        // prescaler division must land exactly on the raw tick count.
        let prescalers = [
            Prescaler::Div2,
            Prescaler::Div4,
            Prescaler::Div8,
            Prescaler::Div16,
            Prescaler::Div32,
            Prescaler::Div64,
            Prescaler::Div128,
            Prescaler::Div256,
        ];
        let mut accepted = 0;
        for clock in [12_000_000u32, 16_000_000, 20_000_000] {
            for full_scale in [3_200_000u32, 5_120_000, 6_400_000] {
                let raw = (clock / 1_000_000 / 4) * (1000 * 2048) / (full_scale / 1000);
                for prescaler in prescalers {
                    if let Ok(period) = derive(clock, full_scale, prescaler) {
                        accepted += 1;
                        assert_eq!(
                            period.ticks() as u32 * prescaler.divisor(),
                            raw,
                            "clock={clock} full_scale={full_scale} prescaler={}",
                            prescaler.divisor()
                        );
                    }
                }
            }
        }
        assert!(accepted > 0);
    }

    #[test]
    fn recommended_table_matches_the_datasheet_comment() {
        // The suggested-values table from the hardware notes.
        for (clock, full_scale, prescaler, ticks) in [
            (20_000_000, 6_400_000, Prescaler::Div64, 25),
            (20_000_000, 3_200_000, Prescaler::Div128, 25),
            (16_000_000, 6_400_000, Prescaler::Div64, 20),
            (16_000_000, 3_200_000, Prescaler::Div128, 20),
            (12_000_000, 6_400_000, Prescaler::Div64, 15),
            (12_000_000, 3_200_000, Prescaler::Div128, 15),
        ] {
            assert_eq!(derive(clock, full_scale, prescaler).unwrap().ticks(), ticks);
        }
    }

    #[test]
    fn extended_range_scales_exactly_tenfold() {
        let base = derive(12_000_000, 6_400_000, Prescaler::Div64).unwrap();
        let extended = base.scaled(10);
        assert_eq!(extended.value(), -150);
        assert_eq!(extended.reload_byte(), 106);
    }

    #[test]
    fn scaling_clamps_at_the_register_range() {
        let base = derive(20_000_000, 6_400_000, Prescaler::Div64).unwrap();
        assert_eq!(base.scaled(10).value(), -250);
        assert_eq!(base.scaled(11).value(), -256);
        assert_eq!(base.scaled(11).reload_byte(), 0);
    }

    #[test]
    fn shared_period_round_trips_the_reload_byte() {
        let base = derive(12_000_000, 6_400_000, Prescaler::Div64).unwrap();
        let shared = SharedPeriod::new(base);
        assert_eq!(shared.reload_byte(), 0xF1);
        shared.set(base.scaled(10));
        assert_eq!(shared.reload_byte(), 106);
        shared.set(base);
        assert_eq!(shared.reload_byte(), 0xF1);
    }
}
