//! Display controller capability table.
//!
//! [`DisplayDriver`] is the fixed set of operations the presentation task
//! drives: a handful of one-shot configuration calls used during bring-up and
//! one repeated draw-text call. The SSD1339 driver implements it for the real
//! panel; tests substitute a recorder.

use core::ops::BitOr;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;

/// Inclusive rectangle in controller coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Region {
    pub x0: u8,
    pub y0: u8,
    pub x1: u8,
    pub y1: u8,
}

impl Region {
    pub const fn new(
        x0: u8,
        y0: u8,
        x1: u8,
        y1: u8,
    ) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Re-map and color depth flags (SSD1339 command `0xA0`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct RemapMode(u8);

impl RemapMode {
    /// Horizontal address increment, normal column mapping, RGB order.
    pub const DEFAULT: Self = Self(0x00);
    /// Vertical instead of horizontal address increment.
    pub const VERTICAL_INCREMENT: Self = Self(0x01);
    /// Column address 127 mapped to SEG0.
    pub const COLUMN_REVERSE: Self = Self(0x02);
    /// BGR instead of RGB color sequence.
    pub const BGR: Self = Self(0x04);
    /// Scan from COM[N-1] to COM0.
    pub const COM_SCAN_REVERSE: Self = Self(0x10);
    /// Odd/even split of the COM pins.
    pub const COM_ODD_EVEN: Self = Self(0x20);
    /// 256 colors (8 bits per pixel).
    pub const COLOR_256: Self = Self(0x00);
    /// 65k colors (RGB565, two bytes per pixel on an 8-bit bus).
    pub const COLOR_65K: Self = Self(0x40);
    /// 262k colors.
    pub const COLOR_262K: Self = Self(0x80);

    #[inline]
    pub const fn union(
        self,
        other: Self,
    ) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn bits(self) -> u8 { self.0 }
}

impl BitOr for RemapMode {
    type Output = Self;

    fn bitor(
        self,
        rhs: Self,
    ) -> Self {
        self.union(rhs)
    }
}

/// Per color channel (A, B, C) settings for contrast current and precharge.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct ColorLevels {
    pub a: u8,
    pub b: u8,
    pub c: u8,
}

impl ColorLevels {
    pub const fn new(
        a: u8,
        b: u8,
        c: u8,
    ) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] { [self.a, self.b, self.c] }
}

/// Controller sleep state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum SleepMode {
    /// Panel off, controller in low-power sleep.
    On,
    /// Panel driven.
    Off,
}

/// What the panel shows regardless of (or according to) display RAM.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum DisplayMode {
    /// Every pixel off. Used to keep the panel blank during bring-up.
    AllOff,
    /// Every pixel at full gray scale.
    AllOn,
    /// Show display RAM.
    Normal,
    /// Show display RAM inverted.
    Inverse,
}

/// Operations the presentation task needs from a display controller.
///
/// Everything except [`draw_text`](Self::draw_text) is used exactly once, in
/// the bring-up sequence.
pub trait DisplayDriver {
    type Error;

    /// Put the physical bus lines into their idle output state.
    fn configure_lines(&mut self) -> Result<(), Self::Error>;

    fn set_column_address(
        &mut self,
        start: u8,
        end: u8,
    ) -> Result<(), Self::Error>;

    fn set_row_address(
        &mut self,
        start: u8,
        end: u8,
    ) -> Result<(), Self::Error>;

    fn set_remap_and_color_depth(
        &mut self,
        mode: RemapMode,
    ) -> Result<(), Self::Error>;

    fn set_contrast_current(
        &mut self,
        levels: ColorLevels,
    ) -> Result<(), Self::Error>;

    fn set_precharge_voltage(
        &mut self,
        levels: ColorLevels,
    ) -> Result<(), Self::Error>;

    /// Select the controller's built-in gray scale lookup table.
    fn use_builtin_lut(&mut self) -> Result<(), Self::Error>;

    fn set_sleep_mode(
        &mut self,
        mode: SleepMode,
    ) -> Result<(), Self::Error>;

    fn set_display_mode(
        &mut self,
        mode: DisplayMode,
    ) -> Result<(), Self::Error>;

    /// Fill a region of display RAM with black.
    fn clear_region(
        &mut self,
        region: Region,
    ) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at `position`, painting the full
    /// glyph cells (foreground and background).
    fn draw_text(
        &mut self,
        font: &MonoFont<'_>,
        position: Point,
        foreground: Rgb565,
        background: Rgb565,
        text: &str,
    ) -> Result<(), Self::Error>;
}
