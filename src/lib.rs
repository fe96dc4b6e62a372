//! Voltmeter library - testable modules for the ADC voltmeter firmware.
//!
//! This library contains the task bodies, the sample hand-off channel, the
//! scheduler model and the SSD1339 driver, all generic over `embedded-hal`
//! traits so they can be tested on the host machine. The binary (`main.rs`)
//! uses this library and adds the RP2350-specific wiring.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu  # Linux
//! cargo test --lib --target aarch64-apple-darwin      # macOS
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

// Must come first so the logging macros are in scope for every module below
#[macro_use]
mod log;

// Configuration
pub mod config;

// Data flowing between tasks
pub mod channel;
pub mod sample;

// Task lifecycle
pub mod scheduler;
pub mod tasks;

// Display controller and bus
pub mod drivers;

#[cfg(test)]
pub(crate) mod testing;

// Re-export at top level for the binary
pub use channel::{SampleChannel, SampleReceiver, SampleSender};
pub use sample::{Sample, Voltage};
pub use scheduler::{ExecutorLevel, Launcher, Priority, Scheduler, SchedulerError, Task};
