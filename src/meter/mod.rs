pub mod gate;
pub mod period;
pub mod range;

pub use gate::{GateDriver, GateState};
pub use period::{ConfigError, SharedPeriod, TimerPeriod};
pub use range::{RangeMode, RangeSelector};
