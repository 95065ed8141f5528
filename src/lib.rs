//! Binary-readout frequency counter firmware.
//!
//! An external HC4040/HC4020 ripple counter counts the input signal while a
//! gate line enables its clock input. This crate produces the gate waveform
//! and the counter reset pulses: the measurement window is timed so that the
//! counter's most significant output bit lights exactly at the configured
//! full-scale input frequency, making the LED readout self-scaling. The
//! counter outputs drive LEDs directly and are never read back.
//!
//! The timing core (`meter`) is hardware-agnostic and tested on the host;
//! the register-level backends (`hal::gpio`, `hal::timer::Timer0`) and the
//! firmware binary are gated behind the `atmega128` feature.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod hal;
pub mod meter;

pub use hal::timer::{Prescaler, ReloadTimer};
pub use meter::gate::{GateDriver, GateState};
pub use meter::period::{ConfigError, SharedPeriod, TimerPeriod};
pub use meter::range::{RangeMode, RangeSelector};
