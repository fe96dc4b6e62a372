//! Single-slot sample hand-off between the acquisition and presentation tasks.
//!
//! The channel is a mailbox, not a history queue: it holds at most one unread
//! [`Sample`]. Publishing never blocks. While the slot is occupied a new
//! sample is rejected and handed back to the caller, so the older unread value
//! survives until the consumer takes it.
//!
//! # Ownership
//!
//! [`SampleChannel::split`] borrows the channel mutably for the lifetime of the
//! returned handles, so it can be split once only. That leaves exactly one
//! [`SampleSender`] (owned by acquisition) and one [`SampleReceiver`] (owned by
//! presentation). Neither handle is `Clone`.
//!
//! ```ignore
//! static SAMPLES: StaticCell<SampleChannel<CriticalSectionRawMutex>> = StaticCell::new();
//! let (sender, receiver) = SAMPLES.init(SampleChannel::new()).split();
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};

use crate::sample::Sample;

/// Slot count. The whole design depends on this being one.
pub const SAMPLE_CHANNEL_DEPTH: usize = 1;

/// Mailbox carrying the latest unread sample.
pub struct SampleChannel<M: RawMutex> {
    inner: Channel<M, Sample, SAMPLE_CHANNEL_DEPTH>,
}

impl<M: RawMutex> SampleChannel<M> {
    /// Create an empty channel. `const` so it can live in a `StaticCell`.
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Hand out the producer and consumer ends.
    pub fn split(&mut self) -> (SampleSender<'_, M>, SampleReceiver<'_, M>) {
        let inner = &self.inner;
        (
            SampleSender {
                inner: inner.sender(),
            },
            SampleReceiver {
                inner: inner.receiver(),
            },
        )
    }

    /// Number of unread samples (0 or 1).
    #[inline]
    pub fn len(&self) -> usize { self.inner.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.inner.is_empty() }
}

impl<M: RawMutex> Default for SampleChannel<M> {
    fn default() -> Self { Self::new() }
}

/// Producer end. Owned by the acquisition task.
pub struct SampleSender<'ch, M: RawMutex> {
    inner: Sender<'ch, M, Sample, SAMPLE_CHANNEL_DEPTH>,
}

impl<M: RawMutex> SampleSender<'_, M> {
    /// Offer a sample without waiting.
    ///
    /// Returns the sample back as `Err` when the slot still holds an unread
    /// value; the caller decides whether that matters.
    pub fn try_publish(
        &self,
        sample: Sample,
    ) -> Result<(), Sample> {
        self.inner.try_send(sample).map_err(|TrySendError::Full(rejected)| rejected)
    }

    /// Number of unread samples in the slot.
    #[inline]
    pub fn occupancy(&self) -> usize { self.inner.len() }
}

/// Consumer end. Owned by the presentation task.
pub struct SampleReceiver<'ch, M: RawMutex> {
    inner: Receiver<'ch, M, Sample, SAMPLE_CHANNEL_DEPTH>,
}

impl<M: RawMutex> SampleReceiver<'_, M> {
    /// Wait until a sample is available and take it. Never times out.
    pub async fn receive(&self) -> Sample { self.inner.receive().await }

    /// Take the unread sample if there is one.
    pub fn try_receive(&self) -> Option<Sample> { self.inner.try_receive().ok() }

    /// Number of unread samples in the slot.
    #[inline]
    pub fn occupancy(&self) -> usize { self.inner.len() }
}

// =============================================================================
// Unit Tests
// =============================================================================
