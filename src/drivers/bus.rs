//! 8080-style 8-bit parallel bus over plain GPIO.
//!
//! The SSD1339 module is wired for the 8080 interface:
//!
//! | Line | Idle | Role                                   |
//! |------|------|----------------------------------------|
//! | CS   | high | Chip select, low for a transaction     |
//! | D/C  | -    | Low for a command byte, high for data  |
//! | WR   | high | Data latched on the rising edge        |
//! | RD   | high | Unused (write-only), parked high       |
//! | RES  | high | Active-low controller reset            |
//! | D0-7 | -    | Data lines, D0 is the least significant |
//!
//! Bit-banging is slow compared to a PIO or DMA transfer, but the firmware only
//! redraws a few glyphs every 200 ms.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

/// Reset pulse width. The datasheet minimum is 2 us.
const RESET_PULSE_US: u32 = 10;

/// Wait after releasing reset before the first command.
const RESET_RECOVERY_US: u32 = 1_000;

/// Byte-wide write interface to a display controller.
pub trait ParallelBus {
    type Error;

    /// Park the control lines and reset the controller.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Send one command byte.
    fn write_command(
        &mut self,
        command: u8,
    ) -> Result<(), Self::Error>;

    /// Send a run of data bytes in one chip-select window.
    fn write_data(
        &mut self,
        data: &[u8],
    ) -> Result<(), Self::Error>;
}

/// Pins making up the bus. All pins share one type (`Output<'static>` on the
/// RP2350).
pub struct BusPins<P> {
    pub cs: P,
    pub dc: P,
    pub wr: P,
    pub rd: P,
    pub res: P,
    /// D0 first.
    pub data: [P; 8],
}

/// Bit-banged [`ParallelBus`].
pub struct GpioBus<P, D> {
    pins: BusPins<P>,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> GpioBus<P, D> {
    pub fn new(
        pins: BusPins<P>,
        delay: D,
    ) -> Self {
        Self { pins, delay }
    }

    /// Drive the data lines to `byte`.
    fn put_byte(
        &mut self,
        byte: u8,
    ) -> Result<(), P::Error> {
        for (bit, pin) in self.pins.data.iter_mut().enumerate() {
            pin.set_state(PinState::from(byte & (1 << bit) != 0))?;
        }
        Ok(())
    }

    /// Latch the current data lines into the controller.
    fn strobe(&mut self) -> Result<(), P::Error> {
        self.pins.wr.set_low()?;
        self.pins.wr.set_high()
    }
}

impl<P: OutputPin, D: DelayNs> ParallelBus for GpioBus<P, D> {
    type Error = P::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.pins.cs.set_high()?;
        self.pins.rd.set_high()?;
        self.pins.wr.set_high()?;
        self.pins.dc.set_high()?;

        self.pins.res.set_low()?;
        self.delay.delay_us(RESET_PULSE_US);
        self.pins.res.set_high()?;
        self.delay.delay_us(RESET_RECOVERY_US);
        Ok(())
    }

    fn write_command(
        &mut self,
        command: u8,
    ) -> Result<(), Self::Error> {
        self.pins.cs.set_low()?;
        self.pins.dc.set_low()?;
        self.put_byte(command)?;
        self.strobe()?;
        self.pins.cs.set_high()
    }

    fn write_data(
        &mut self,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        self.pins.cs.set_low()?;
        self.pins.dc.set_high()?;
        for &byte in data {
            self.put_byte(byte)?;
            self.strobe()?;
        }
        self.pins.cs.set_high()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
