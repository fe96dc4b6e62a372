//! Periodic ADC sampling.
//!
//! Every [`SAMPLE_PERIOD_MS`] the task reads one conversion and offers it to the
//! sample channel without waiting. If presentation has not taken the previous
//! sample yet, the new one is discarded and only counted. A missed reading is
//! never an error: the next one comes 200 ms later anyway.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::channel::SampleSender;
use crate::config::tasks::{DROP_LOG_INTERVAL, SAMPLE_PERIOD_MS};
use crate::sample::Sample;

/// One synchronous analog conversion.
pub trait AnalogSource {
    type Error;

    /// Read the raw conversion code. Values wider than 12 bits are clamped by
    /// the caller.
    fn read(&mut self) -> Result<u16, Self::Error>;
}

/// What happened in one acquisition cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Outcome {
    /// The sample is now waiting in the channel.
    Published(Sample),
    /// The slot was still occupied; this sample was discarded.
    Dropped(Sample),
    /// The converter reported an error, nothing was offered.
    ReadFailed,
}

/// Acquisition task state.
pub struct Acquisition<'ch, A, M: RawMutex> {
    source: A,
    sender: SampleSender<'ch, M>,
    published: u32,
    dropped: u32,
}

impl<'ch, A: AnalogSource, M: RawMutex> Acquisition<'ch, A, M> {
    pub fn new(
        source: A,
        sender: SampleSender<'ch, M>,
    ) -> Self {
        Self {
            source,
            sender,
            published: 0,
            dropped: 0,
        }
    }

    /// Samples accepted by the channel so far.
    #[inline]
    pub fn published(&self) -> u32 { self.published }

    /// Samples discarded because the slot was occupied.
    #[inline]
    pub fn dropped(&self) -> u32 { self.dropped }

    /// Read once and try to publish. Never blocks.
    pub fn cycle(&mut self) -> Outcome {
        let raw = match self.source.read() {
            Ok(raw) => raw,
            Err(_) => {
                warn!("ADC read failed, skipping cycle");
                return Outcome::ReadFailed;
            }
        };

        let sample = Sample::from_raw(raw);
        match self.sender.try_publish(sample) {
            Ok(()) => {
                self.published = self.published.wrapping_add(1);
                Outcome::Published(sample)
            }
            Err(rejected) => {
                self.dropped = self.dropped.wrapping_add(1);
                debug!("channel full, dropped sample {}", rejected.raw());
                if self.dropped % DROP_LOG_INTERVAL == 0 {
                    info!("{} samples dropped so far", self.dropped);
                }
                Outcome::Dropped(rejected)
            }
        }
    }

    /// Task body.
    pub async fn run<D>(
        mut self,
        mut delay: D,
    ) -> !
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        info!("Acquisition task started ({} ms period)", SAMPLE_PERIOD_MS);
        loop {
            self.cycle();
            delay.delay_ms(SAMPLE_PERIOD_MS).await;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
