use std::env;

fn main() {
    let target = env::var("TARGET").unwrap();

    // Only the firmware binary targets AVR; the library half builds and
    // tests on the host, so the link arg must stay target-conditional.
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega128");
    }
}
