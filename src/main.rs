#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use panic_halt as _;
use core::cell::RefCell;
use avr_device::interrupt::{self, Mutex};

use freqmeter_firmware::config;
use freqmeter_firmware::hal::gpio::board::{GatePin, RangeButton, RangeLed, ResetPin};
use freqmeter_firmware::hal::timer::tc0_cs_bits;
use freqmeter_firmware::hal::Timer0;
use freqmeter_firmware::{GateDriver, RangeSelector, SharedPeriod};

// TC0 has no /2, /4 or /16 prescaler tap; such a configuration must fail
// the build, not run at a neighbouring rate.
const _: () = assert!(
    tc0_cs_bits(config::TIMER_PRESCALER).is_some(),
    "TIMER_PRESCALER divisor has no TC0 clock-select tap"
);

type Driver = GateDriver<Timer0, GatePin, ResetPin>;

/// Live window reload value, written by the main loop and read by the
/// overflow ISR.
static ACTIVE_PERIOD: SharedPeriod = SharedPeriod::new(config::BASE_PERIOD);

static GATE_DRIVER: Mutex<RefCell<Option<Driver>>> = Mutex::new(RefCell::new(None));

#[avr_device::entry]
fn main() -> ! {
    let _dp = avr_device::atmega128a::Peripherals::take().unwrap();

    let gate = GatePin::new().into_output();
    let reset = ResetPin::new().into_output();
    let button = RangeButton::new().into_input_pullup();
    let led = RangeLed::new().into_output();

    let mut driver = GateDriver::new(Timer0::new(), gate, reset);
    driver.start(config::TIMER_PRESCALER);

    interrupt::free(|cs| {
        GATE_DRIVER.borrow(cs).replace(Some(driver));
    });

    let mut range = RangeSelector::new(button, led, config::BASE_PERIOD);

    // All measurement happens in the ISR from here on.
    unsafe { interrupt::enable() };

    loop {
        range.poll(&ACTIVE_PERIOD);
    }
}

#[avr_device::interrupt(atmega128a)]
fn TIMER0_OVF() {
    interrupt::free(|cs| {
        if let Some(driver) = GATE_DRIVER.borrow(cs).borrow_mut().as_mut() {
            driver.on_expiry(&ACTIVE_PERIOD);
        }
    });
}
