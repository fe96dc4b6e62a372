//! ADC Voltmeter Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Samples GP26 every 200 ms and shows the voltage on a 128x128 SSD1339 OLED,
//! while the onboard LED blinks a heartbeat.
//!
//! # Architecture
//!
//! Three tasks on two priority levels:
//! - Heartbeat: LED double-blink, preempts everything else
//! - Acquisition: ADC read, non-blocking hand-off into a single-slot channel
//! - Presentation: one-time display bring-up, then draws each received sample
//!
//! If the tasks cannot be started the LED switches to a rapid 10 Hz blink and
//! the firmware stays there until reset.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]

// Modules only used in the binary (not testable on host)
#[cfg(target_arch = "arm")]
mod app;
#[cfg(target_arch = "arm")]
mod board;

#[cfg(target_arch = "arm")]
use {defmt_rtt as _, panic_probe as _};

#[cfg(target_arch = "arm")]
#[cortex_m_rt::entry]
fn main() -> ! { app::run() }

// Host builds only exist so `cargo test` can compile the whole package
#[cfg(not(target_arch = "arm"))]
fn main() {}

// Program metadata for `picotool info`
#[cfg(target_arch = "arm")]
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"adc-voltmeter"),
    embassy_rp::binary_info::rp_program_description!(c"ADC voltmeter with SSD1339 OLED readout"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];
