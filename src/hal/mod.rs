pub mod timer;

#[cfg(feature = "atmega128")]
pub mod gpio;

// Re-export commonly used types
pub use timer::{Prescaler, ReloadTimer};

#[cfg(feature = "atmega128")]
pub use timer::Timer0;
