//! Task bodies.
//!
//! Three long-lived tasks share the core:
//!
//! | Task           | Priority | Suspends on           | Owns                 |
//! |----------------|----------|-----------------------|----------------------|
//! | `heartbeat`    | 3        | timed sleep           | LED pin              |
//! | `adc`          | 2        | timed sleep           | ADC channel, sender  |
//! | `display`      | 2        | sample channel        | display bus, receiver|
//!
//! Each body is a plain struct with an `async fn run(self, ..) -> !`. The
//! binary wraps them in `#[embassy_executor::task]` functions; tests drive the
//! individual steps directly.

pub mod acquisition;
pub mod heartbeat;
pub mod presentation;

pub use acquisition::{Acquisition, AnalogSource, Outcome};
pub use heartbeat::{Blinker, BlinkStep, fail_stop};
pub use presentation::{Presentation, PresentationError, SessionState};

// =============================================================================
// Unit Tests
// =============================================================================
