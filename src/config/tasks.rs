//! Task table and timing constants.
//!
//! # Priorities
//!
//! Higher numbers preempt lower ones. The heartbeat sits above the two worker
//! tasks so its blink stays regular no matter how busy acquisition or
//! presentation get. The workers share a level and interleave at their
//! suspension points.

use crate::scheduler::Priority;

// =============================================================================
// Task Table
// =============================================================================

/// Number of tasks registered at startup.
pub const TASK_COUNT: usize = 3;

/// Smallest stack budget the scheduler accepts, in bytes.
pub const MINIMAL_STACK_SIZE: usize = 512;

/// Level shared by the acquisition and presentation tasks.
pub const WORKER_PRIORITY: Priority = Priority(2);

pub const HEARTBEAT_TASK: &str = "heartbeat";
pub const HEARTBEAT_PRIORITY: Priority = Priority(3);
pub const HEARTBEAT_STACK_SIZE: usize = MINIMAL_STACK_SIZE;

pub const PRESENTATION_TASK: &str = "display";
pub const PRESENTATION_PRIORITY: Priority = WORKER_PRIORITY;
/// Glyph rendering needs more room than the other two tasks.
pub const PRESENTATION_STACK_SIZE: usize = MINIMAL_STACK_SIZE * 2;

pub const ACQUISITION_TASK: &str = "adc";
pub const ACQUISITION_PRIORITY: Priority = WORKER_PRIORITY;
pub const ACQUISITION_STACK_SIZE: usize = MINIMAL_STACK_SIZE;

// =============================================================================
// Timing
// =============================================================================

/// Acquisition period in milliseconds.
pub const SAMPLE_PERIOD_MS: u32 = 200;

/// Long "on" phase of the heartbeat.
pub const HEARTBEAT_LONG_MS: u32 = 1000;

/// Short phases of the heartbeat double-blink.
pub const HEARTBEAT_SHORT_MS: u32 = 100;

/// Half period of the fail-stop blink (10 Hz).
pub const FAIL_STOP_HALF_PERIOD_MS: u32 = 50;

/// Wait between clearing the panel and switching to normal display mode.
pub const DISPLAY_SETTLE_MS: u32 = 1000;

/// Log the dropped-sample count every this many drops.
pub const DROP_LOG_INTERVAL: u32 = 25;
