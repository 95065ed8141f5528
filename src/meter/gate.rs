//! Gate/reset waveform driver.
//!
//! Runs entirely inside the timer overflow interrupt. Each expiry flips
//! the gate line, so the external counter sees the input signal for
//! exactly one reload period out of every two; when the window re-opens
//! the counter is pulsed back to zero so every window starts fresh.

use embedded_hal::digital::v2::OutputPin;

use super::period::SharedPeriod;
use crate::hal::timer::{Prescaler, ReloadTimer};

/// Busy no-ops holding the master-reset line high. The HC4040 wants a
/// 20-110 ns minimum reset pulse at 5 V, so a handful of instruction
/// cycles covers it at any supported clock. Deliberately not a timed
/// sleep: nothing here may block or be preempted.
const MR_PULSE_CYCLES: u8 = 16;

/// Measurement window state. Owned exclusively by [`GateDriver`]; the
/// rest of the firmware only sees it through [`GateDriver::state`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GateState {
    /// Gate line low, counter clock input disabled.
    Closed,
    /// Gate line high, counter counting input edges.
    Open,
}

/// Drives the counter's clock-enable (gate) and master-reset lines from
/// the timer overflow interrupt.
pub struct GateDriver<T, G, R> {
    timer: T,
    gate: G,
    reset: R,
    state: GateState,
}

impl<T, G, R> GateDriver<T, G, R>
where
    T: ReloadTimer,
    G: OutputPin,
    R: OutputPin,
{
    /// Set up idle levels: gate low (window closed) and reset asserted,
    /// holding the external counter cleared until the first window opens.
    pub fn new(timer: T, mut gate: G, mut reset: R) -> Self {
        let _ = gate.set_low();
        let _ = reset.set_high();
        GateDriver {
            timer,
            gate,
            reset,
            state: GateState::Closed,
        }
    }

    /// Program the prescaler and arm the expiry interrupt. Called once at
    /// init; the interrupt stays enabled for the life of the firmware.
    pub fn start(&mut self, prescaler: Prescaler) {
        self.timer.set_prescaler(prescaler);
        self.timer.clear_expiry();
        self.timer.enable_expiry_interrupt();
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Timer expiry handler body. Cannot fail: all configuration problems
    /// are rejected before the interrupt is ever enabled.
    pub fn on_expiry(&mut self, period: &SharedPeriod) {
        // Flag clear and reload come first so the reload jitter stays
        // within a couple of instruction cycles.
        self.timer.clear_expiry();
        self.timer.reload(period.reload_byte());

        match self.state {
            GateState::Closed => {
                let _ = self.gate.set_high();
                self.state = GateState::Open;
                // New window: force the counter back to zero.
                let _ = self.reset.set_high();
                mr_pulse_delay();
                let _ = self.reset.set_low();
            }
            GateState::Open => {
                let _ = self.gate.set_low();
                self.state = GateState::Closed;
            }
        }
    }
}

#[inline(always)]
fn mr_pulse_delay() {
    for _ in 0..MR_PULSE_CYCLES {
        #[cfg(feature = "atmega128")]
        avr_device::asm::nop();
        #[cfg(not(feature = "atmega128"))]
        core::hint::spin_loop();
    }
}
