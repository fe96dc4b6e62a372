//! Display bring-up and the voltage readout loop.
//!
//! # Session
//!
//! ```text
//! Uninitialized ──bring_up()──> Configuring ──> Ready
//! ```
//!
//! Bring-up runs once, before the first draw. The state only ever moves
//! forward. A driver error during bring-up is logged and abandons the rest of
//! the sequence, but the session still ends up `Ready`: the panel may stay
//! dark, while the rest of the system keeps running and every later draw is
//! attempted anyway.
//!
//! # Rendering
//!
//! Each received [`Sample`] is converted to a [`Voltage`] and drawn as
//! `"X.YY V"` at a fixed position with an opaque background, so a new value
//! fully overwrites the previous one without clearing the screen.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::channel::SampleReceiver;
use crate::config::display::{CONTRAST_CURRENT, FULL_REGION, PRECHARGE_VOLTAGE, REMAP_MODE};
use crate::config::layout::{BACKGROUND_COLOR, LAST_COLUMN, LAST_ROW, TEXT_COLOR, VOLTAGE_FONT, VOLTAGE_POSITION};
use crate::config::tasks::DISPLAY_SETTLE_MS;
use crate::drivers::display::{DisplayDriver, DisplayMode, SleepMode};
use crate::sample::{Sample, Voltage};

/// Display session lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum SessionState {
    Uninitialized,
    Configuring,
    Ready,
}

/// Presentation failures.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum PresentationError<E> {
    /// The display driver reported an error.
    Driver(E),
    /// Draw requested before bring-up.
    NotReady,
    /// Bring-up requested a second time.
    AlreadyInitialized,
}

impl<E> From<E> for PresentationError<E> {
    fn from(error: E) -> Self { Self::Driver(error) }
}

/// Presentation task state. Owns the display driver outright.
pub struct Presentation<D> {
    driver: D,
    state: SessionState,
    frames: u32,
}

impl<D: DisplayDriver> Presentation<D> {
    pub const fn new(driver: D) -> Self {
        Self {
            driver,
            state: SessionState::Uninitialized,
            frames: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState { self.state }

    /// Readouts drawn successfully.
    #[inline]
    pub fn frames(&self) -> u32 { self.frames }

    /// Configure the controller and unblank the panel. Allowed once.
    ///
    /// The session is `Ready` afterwards even when a step failed; the first
    /// driver error is returned so the caller can report it.
    pub async fn bring_up<T>(
        &mut self,
        delay: &mut T,
    ) -> Result<(), PresentationError<D::Error>>
    where
        T: embedded_hal_async::delay::DelayNs,
    {
        if self.state != SessionState::Uninitialized {
            return Err(PresentationError::AlreadyInitialized);
        }

        self.state = SessionState::Configuring;
        let result = self.configure(delay).await;
        self.state = SessionState::Ready;

        match &result {
            Ok(()) => info!("Display ready"),
            Err(_) => error!("Display bring-up failed, continuing without a configured panel"),
        }
        result.map_err(PresentationError::Driver)
    }

    async fn configure<T>(
        &mut self,
        delay: &mut T,
    ) -> Result<(), D::Error>
    where
        T: embedded_hal_async::delay::DelayNs,
    {
        let driver = &mut self.driver;

        debug!("display: configuring bus lines");
        driver.configure_lines()?;

        debug!("display: addressing and color setup");
        driver.set_column_address(0, LAST_COLUMN)?;
        driver.set_row_address(0, LAST_ROW)?;
        driver.set_remap_and_color_depth(REMAP_MODE)?;
        driver.set_contrast_current(CONTRAST_CURRENT)?;
        driver.set_precharge_voltage(PRECHARGE_VOLTAGE)?;
        driver.use_builtin_lut()?;

        // Wake with the panel blanked so the RAM clear is not visible
        debug!("display: wake and clear");
        driver.set_sleep_mode(SleepMode::Off)?;
        driver.set_display_mode(DisplayMode::AllOff)?;
        driver.clear_region(FULL_REGION)?;

        delay.delay_ms(DISPLAY_SETTLE_MS).await;
        driver.set_display_mode(DisplayMode::Normal)
    }

    /// Draw one sample. Returns the voltage that was shown.
    pub fn show(
        &mut self,
        sample: Sample,
    ) -> Result<Voltage, PresentationError<D::Error>> {
        if self.state != SessionState::Ready {
            return Err(PresentationError::NotReady);
        }

        let voltage = sample.voltage();
        let text = voltage.to_text();
        self.driver
            .draw_text(VOLTAGE_FONT, VOLTAGE_POSITION, TEXT_COLOR, BACKGROUND_COLOR, &text)?;

        self.frames = self.frames.wrapping_add(1);
        Ok(voltage)
    }

    /// Wait for the next sample and draw it.
    pub async fn serve_next<M: RawMutex>(
        &mut self,
        receiver: &SampleReceiver<'_, M>,
    ) -> Result<Voltage, PresentationError<D::Error>> {
        let sample = receiver.receive().await;
        self.show(sample)
    }

    /// Task body: bring-up, then serve forever.
    pub async fn run<M, T>(
        mut self,
        receiver: SampleReceiver<'_, M>,
        mut delay: T,
    ) -> !
    where
        M: RawMutex,
        T: embedded_hal_async::delay::DelayNs,
    {
        info!("Presentation task started");
        // Failure already logged; keep serving regardless
        self.bring_up(&mut delay).await.ok();

        loop {
            if self.serve_next(&receiver).await.is_err() {
                warn!("draw failed");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
