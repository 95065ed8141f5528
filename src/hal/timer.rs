//! Reload-timer abstraction and the Timer0 register backend.

/// Timebase prescaler. The eight legal divisors are the complete set; a
/// raw number can only become a `Prescaler` through
/// [`Prescaler::from_divisor`]. Backends translate the divisor into
/// their own clock-select encoding (see [`tc0_cs_bits`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Div2 = 0,
    Div4 = 1,
    Div8 = 2,
    Div16 = 3,
    Div32 = 4,
    Div64 = 5,
    Div128 = 6,
    Div256 = 7,
}

impl Prescaler {
    pub const fn divisor(self) -> u32 {
        2u32 << (self as u32)
    }

    pub const fn from_divisor(divisor: u32) -> Option<Prescaler> {
        match divisor {
            2 => Some(Prescaler::Div2),
            4 => Some(Prescaler::Div4),
            8 => Some(Prescaler::Div8),
            16 => Some(Prescaler::Div16),
            32 => Some(Prescaler::Div32),
            64 => Some(Prescaler::Div64),
            128 => Some(Prescaler::Div128),
            256 => Some(Prescaler::Div256),
            _ => None,
        }
    }
}

/// TCCR0 CS02:0 value for a divisor. Timer/Counter0 taps its prescaler
/// at {8, 32, 64, 128, 256}; the remaining legal divisors (2, 4, 16) do
/// not exist on this chip and must be rejected at configuration time,
/// never mapped to a neighbouring rate.
pub const fn tc0_cs_bits(prescaler: Prescaler) -> Option<u8> {
    match prescaler {
        Prescaler::Div8 => Some(2),
        Prescaler::Div32 => Some(3),
        Prescaler::Div64 => Some(4),
        Prescaler::Div128 => Some(5),
        Prescaler::Div256 => Some(6),
        Prescaler::Div2 | Prescaler::Div4 | Prescaler::Div16 => None,
    }
}

/// A free-running up-counter that interrupts on overflow, with a
/// writable reload register and a clearable expiry flag.
pub trait ReloadTimer {
    fn set_prescaler(&mut self, prescaler: Prescaler);

    /// Write the counter register; the timer overflows after
    /// `256 - value` ticks.
    fn reload(&mut self, value: u8);

    fn clear_expiry(&mut self);

    /// Arm the overflow interrupt. Write-once at init.
    fn enable_expiry_interrupt(&mut self);
}

#[cfg(feature = "atmega128")]
mod avr {
    use avr_device::atmega128a::TC0;

    use super::{tc0_cs_bits, Prescaler, ReloadTimer};

    const PRESCALER_MASK: u8 = 0x07;

    /// Timer/Counter0 in normal (overflow) mode.
    pub struct Timer0 {
        _priv: (),
    }

    impl Timer0 {
        pub fn new() -> Self {
            unsafe {
                let p = TC0::ptr();
                // Normal mode, stopped, counter cleared
                (*p).tccr.write(|w| w.bits(0));
                (*p).tcnt.write(|w| w.bits(0));
            }
            Timer0 { _priv: () }
        }
    }

    impl Default for Timer0 {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ReloadTimer for Timer0 {
        fn set_prescaler(&mut self, prescaler: Prescaler) {
            // A divisor without a TC0 tap is a configuration fault. The
            // firmware entry checks this at build time, so the halt is
            // unreachable; it is still a halt, not a wrong rate.
            let cs = match tc0_cs_bits(prescaler) {
                Some(cs) => cs,
                None => panic!("prescaler divisor has no TC0 clock-select tap"),
            };
            unsafe {
                let p = TC0::ptr();
                (*p).tccr
                    .modify(|r, w| w.bits((r.bits() & !PRESCALER_MASK) | (cs & PRESCALER_MASK)));
            }
        }

        fn reload(&mut self, value: u8) {
            unsafe {
                (*TC0::ptr()).tcnt.write(|w| w.bits(value));
            }
        }

        fn clear_expiry(&mut self) {
            // Overflow flag clears by writing a one to it.
            unsafe {
                (*TC0::ptr()).tifr.write(|w| w.bits(1));
            }
        }

        fn enable_expiry_interrupt(&mut self) {
            unsafe {
                (*TC0::ptr()).timsk.modify(|r, w| w.bits(r.bits() | 1));
            }
        }
    }
}

#[cfg(feature = "atmega128")]
pub use avr::Timer0;
