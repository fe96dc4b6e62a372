//! Application configuration.
//!
//! Everything here is a compiled constant; the firmware has no runtime
//! configuration surface.
//!
//! - `analog`: ADC resolution and reference voltage
//! - `display`: SSD1339 operating parameters applied during bring-up
//! - `layout`: Screen geometry, text placement, colors and font
//! - `tasks`: Task names, priorities, stack budgets and timing

pub mod analog;
pub mod display;
pub mod layout;
pub mod tasks;

// Re-export the constants the binary wires up directly
pub use tasks::{
    ACQUISITION_PRIORITY,
    ACQUISITION_STACK_SIZE,
    ACQUISITION_TASK,
    HEARTBEAT_PRIORITY,
    HEARTBEAT_STACK_SIZE,
    HEARTBEAT_TASK,
    PRESENTATION_PRIORITY,
    PRESENTATION_STACK_SIZE,
    PRESENTATION_TASK,
    TASK_COUNT,
};
