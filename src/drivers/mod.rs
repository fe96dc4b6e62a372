//! Display hardware drivers.
//!
//! - `display`: The capability table the presentation task needs from a display
//! - `bus`: 8080-style parallel bus, bit-banged over GPIO
//! - `ssd1339`: SSD1339 OLED controller on top of the parallel bus

pub mod bus;
pub mod display;
pub mod ssd1339;

pub use bus::{BusPins, GpioBus, ParallelBus};
pub use display::{ColorLevels, DisplayDriver, DisplayMode, Region, RemapMode, SleepMode};
pub use ssd1339::Ssd1339;
