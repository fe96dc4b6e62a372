//! Heartbeat blink and the fail-stop diagnostic pattern.
//!
//! The heartbeat is a fixed double blink that proves the scheduler is alive:
//!
//! ```text
//!  HIGH ──────────1000ms──────────┐    ┌100┐
//!                                 └100─┘   └100─ (repeat)
//! ```
//!
//! It reads nothing and touches no shared state. Each step is an immediate
//! level change followed by a cooperative sleep.
//!
//! The fail-stop pattern is a fast, even blink that only runs after the
//! scheduler failed. It busy-waits instead of sleeping because there is no
//! executor left to yield to.

use embedded_hal::digital::{OutputPin, PinState};

use crate::config::tasks::{FAIL_STOP_HALF_PERIOD_MS, HEARTBEAT_LONG_MS, HEARTBEAT_SHORT_MS};

/// One level of a blink pattern and how long to hold it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlinkStep {
    pub state: PinState,
    pub duration_ms: u32,
}

impl BlinkStep {
    pub const fn high(duration_ms: u32) -> Self {
        Self {
            state: PinState::High,
            duration_ms,
        }
    }

    pub const fn low(duration_ms: u32) -> Self {
        Self {
            state: PinState::Low,
            duration_ms,
        }
    }
}

/// Normal liveness signal.
pub const HEARTBEAT_PATTERN: [BlinkStep; 4] = [
    BlinkStep::high(HEARTBEAT_LONG_MS),
    BlinkStep::low(HEARTBEAT_SHORT_MS),
    BlinkStep::high(HEARTBEAT_SHORT_MS),
    BlinkStep::low(HEARTBEAT_SHORT_MS),
];

/// Rapid constant blink shown after a fatal scheduler exit.
pub const FAIL_STOP_PATTERN: [BlinkStep; 2] = [
    BlinkStep::high(FAIL_STOP_HALF_PERIOD_MS),
    BlinkStep::low(FAIL_STOP_HALF_PERIOD_MS),
];

/// Plays a blink pattern on one output pin, forever.
pub struct Blinker<P> {
    pin: P,
    pattern: &'static [BlinkStep],
    next: usize,
}

impl<P: OutputPin> Blinker<P> {
    /// `pattern` must not be empty.
    pub fn new(
        pin: P,
        pattern: &'static [BlinkStep],
    ) -> Self {
        assert!(!pattern.is_empty());
        Self { pin, pattern, next: 0 }
    }

    pub fn heartbeat(pin: P) -> Self { Self::new(pin, &HEARTBEAT_PATTERN) }

    pub fn fail_stop(pin: P) -> Self { Self::new(pin, &FAIL_STOP_PATTERN) }

    /// Apply the next level and move on. The step is returned even if the pin
    /// reported an error, so the caller still waits its duration.
    fn advance(&mut self) -> (BlinkStep, Result<(), P::Error>) {
        let step = self.pattern[self.next];
        self.next = (self.next + 1) % self.pattern.len();
        (step, self.pin.set_state(step.state))
    }

    /// Set the next level and sleep for its duration.
    pub async fn step<D>(
        &mut self,
        delay: &mut D,
    ) -> Result<BlinkStep, P::Error>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let (step, result) = self.advance();
        delay.delay_ms(step.duration_ms).await;
        result.map(|()| step)
    }

    /// Set the next level and busy-wait for its duration.
    pub fn step_blocking<D>(
        &mut self,
        delay: &mut D,
    ) -> Result<BlinkStep, P::Error>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let (step, result) = self.advance();
        delay.delay_ms(step.duration_ms);
        result.map(|()| step)
    }

    /// Heartbeat task body.
    pub async fn run<D>(
        mut self,
        mut delay: D,
    ) -> !
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        info!("Heartbeat task started");
        loop {
            // A pin error only costs one blink phase; keep the rhythm
            if self.step(&mut delay).await.is_err() {
                warn!("heartbeat output error");
            }
        }
    }
}

/// Blink the fail-stop pattern forever. Never returns.
pub fn fail_stop<P, D>(
    pin: P,
    mut delay: D,
) -> !
where
    P: OutputPin,
    D: embedded_hal::delay::DelayNs,
{
    let mut blinker = Blinker::fail_stop(pin);
    loop {
        blinker.step_blocking(&mut delay).ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::testing::{LevelTrace, TracePin, VirtualClock, VirtualDelay};

    /// Expected heartbeat level at `t_ms` into the pattern.
    fn heartbeat_level_at(t_ms: u64) -> bool {
        match t_ms % 1300 {
            0..1000 => true,
            1000..1100 => false,
            1100..1200 => true,
            _ => false,
        }
    }

    #[test]
    fn test_pattern_timing() {
        let durations: u32 = HEARTBEAT_PATTERN.iter().map(|step| step.duration_ms).sum();
        assert_eq!(durations, 1300);
        assert_eq!(HEARTBEAT_PATTERN[0], BlinkStep::high(1000));
        assert_eq!(HEARTBEAT_PATTERN[1], BlinkStep::low(100));
        assert_eq!(HEARTBEAT_PATTERN[2], BlinkStep::high(100));
        assert_eq!(HEARTBEAT_PATTERN[3], BlinkStep::low(100));
    }

    #[test]
    fn test_steps_cycle_through_pattern() {
        let clock = VirtualClock::new();
        let trace = LevelTrace::default();
        let mut delay = VirtualDelay::new(&clock);
        let mut blinker = Blinker::heartbeat(TracePin::new(&clock, &trace));

        let steps: Vec<BlinkStep> = (0..8).map(|_| block_on(blinker.step(&mut delay)).unwrap()).collect();
        assert_eq!(steps[..4], HEARTBEAT_PATTERN);
        assert_eq!(steps[4..], HEARTBEAT_PATTERN);
        assert_eq!(clock.now_ms(), 2 * 1300);
    }

    #[test]
    fn test_level_matches_at_1ms_resolution() {
        let clock = VirtualClock::new();
        let trace = LevelTrace::default();
        let mut delay = VirtualDelay::new(&clock);
        let mut blinker = Blinker::heartbeat(TracePin::new(&clock, &trace));

        // Three full cycles
        for _ in 0..12 {
            block_on(blinker.step(&mut delay)).unwrap();
        }

        for t in 0..3 * 1300 {
            assert_eq!(trace.level_at(t), Some(heartbeat_level_at(t)), "wrong level at {} ms", t);
        }
    }

    #[test]
    fn test_transitions_are_immediate() {
        let clock = VirtualClock::new();
        let trace = LevelTrace::default();
        let mut delay = VirtualDelay::new(&clock);
        let mut blinker = Blinker::heartbeat(TracePin::new(&clock, &trace));

        for _ in 0..4 {
            block_on(blinker.step(&mut delay)).unwrap();
        }
        assert_eq!(trace.edges(), [(0, true), (1000, false), (1100, true), (1200, false)]);
    }

    #[test]
    fn test_fail_stop_pattern_is_fast_and_even() {
        let clock = VirtualClock::new();
        let trace = LevelTrace::default();
        let mut delay = VirtualDelay::new(&clock);
        let mut blinker = Blinker::fail_stop(TracePin::new(&clock, &trace));

        for _ in 0..40 {
            blinker.step_blocking(&mut delay).unwrap();
        }

        let edges = trace.edges();
        assert_eq!(edges.len(), 40);
        for (i, (t, high)) in edges.iter().enumerate() {
            assert_eq!(*t, i as u64 * 50);
            assert_eq!(*high, i % 2 == 0);
        }
        // Distinct from the heartbeat: no 1000 ms phase anywhere
        assert!(FAIL_STOP_PATTERN.iter().all(|step| step.duration_ms < HEARTBEAT_SHORT_MS));
    }

    #[test]
    #[should_panic]
    fn test_empty_pattern_rejected() {
        static EMPTY: [BlinkStep; 0] = [];
        let clock = VirtualClock::new();
        let _ = Blinker::new(TracePin::new(&clock, &LevelTrace::default()), &EMPTY);
    }
}
