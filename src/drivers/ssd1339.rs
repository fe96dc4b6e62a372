//! SSD1339 128x128 RGB OLED controller driver.
//!
//! Commands go out over any [`ParallelBus`]. The driver keeps no framebuffer:
//! drawing sets a column/row window and streams pixels straight into display
//! RAM, which is all a small text readout needs.
//!
//! # Pixel Format
//!
//! With [`RemapMode::COLOR_65K`] selected, each pixel is two bytes on the
//! 8-bit bus, RGB565 big-endian (`RRRRRGGG GGGBBBBB`).

use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use super::bus::ParallelBus;
use super::display::{ColorLevels, DisplayDriver, DisplayMode, Region, RemapMode, SleepMode};

/// Panel dimensions.
pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 128;

/// Pixels buffered before each bus write (two bytes per pixel).
const PIXEL_CHUNK_BYTES: usize = 64;

/// SSD1339 command bytes.
pub mod command {
    pub const SET_COLUMN_ADDRESS: u8 = 0x15;
    pub const WRITE_RAM: u8 = 0x5C;
    pub const SET_ROW_ADDRESS: u8 = 0x75;
    pub const CLEAR_WINDOW: u8 = 0x8E;
    pub const SET_REMAP: u8 = 0xA0;
    pub const DISPLAY_ALL_OFF: u8 = 0xA4;
    pub const DISPLAY_ALL_ON: u8 = 0xA5;
    pub const DISPLAY_NORMAL: u8 = 0xA6;
    pub const DISPLAY_INVERSE: u8 = 0xA7;
    pub const SLEEP_ON: u8 = 0xAE;
    pub const SLEEP_OFF: u8 = 0xAF;
    pub const USE_BUILTIN_LUT: u8 = 0xB9;
    pub const SET_PRECHARGE_VOLTAGE: u8 = 0xBB;
    pub const SET_CONTRAST_CURRENT: u8 = 0xC1;
}

use command::*;

/// SSD1339 on a parallel bus.
pub struct Ssd1339<B> {
    bus: B,
}

impl<B: ParallelBus> Ssd1339<B> {
    pub const fn new(bus: B) -> Self { Self { bus } }

    /// Command byte followed by its argument bytes.
    fn command(
        &mut self,
        command: u8,
        args: &[u8],
    ) -> Result<(), B::Error> {
        self.bus.write_command(command)?;
        self.bus.write_data(args)
    }

    /// Point RAM writes at `area` and start a RAM write.
    ///
    /// `area` must be non-empty and inside the panel.
    fn open_window(
        &mut self,
        area: &Rectangle,
    ) -> Result<(), B::Error> {
        let x0 = area.top_left.x as u8;
        let y0 = area.top_left.y as u8;
        let x1 = (area.top_left.x + area.size.width as i32 - 1) as u8;
        let y1 = (area.top_left.y + area.size.height as i32 - 1) as u8;

        self.command(SET_COLUMN_ADDRESS, &[x0, x1])?;
        self.command(SET_ROW_ADDRESS, &[y0, y1])?;
        self.bus.write_command(WRITE_RAM)
    }

    /// Stream pixels into the open window.
    fn write_pixels<I>(
        &mut self,
        colors: I,
    ) -> Result<(), B::Error>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let mut chunk = [0u8; PIXEL_CHUNK_BYTES];
        let mut len = 0;

        for color in colors {
            let bytes = RawU16::from(color).into_inner().to_be_bytes();
            chunk[len] = bytes[0];
            chunk[len + 1] = bytes[1];
            len += 2;

            if len == PIXEL_CHUNK_BYTES {
                self.bus.write_data(&chunk)?;
                len = 0;
            }
        }
        self.bus.write_data(&chunk[..len])
    }
}

impl<B: ParallelBus> DisplayDriver for Ssd1339<B> {
    type Error = B::Error;

    fn configure_lines(&mut self) -> Result<(), Self::Error> { self.bus.init() }

    fn set_column_address(
        &mut self,
        start: u8,
        end: u8,
    ) -> Result<(), Self::Error> {
        self.command(SET_COLUMN_ADDRESS, &[start, end])
    }

    fn set_row_address(
        &mut self,
        start: u8,
        end: u8,
    ) -> Result<(), Self::Error> {
        self.command(SET_ROW_ADDRESS, &[start, end])
    }

    fn set_remap_and_color_depth(
        &mut self,
        mode: RemapMode,
    ) -> Result<(), Self::Error> {
        self.command(SET_REMAP, &[mode.bits()])
    }

    fn set_contrast_current(
        &mut self,
        levels: ColorLevels,
    ) -> Result<(), Self::Error> {
        self.command(SET_CONTRAST_CURRENT, &levels.to_bytes())
    }

    fn set_precharge_voltage(
        &mut self,
        levels: ColorLevels,
    ) -> Result<(), Self::Error> {
        self.command(SET_PRECHARGE_VOLTAGE, &levels.to_bytes())
    }

    fn use_builtin_lut(&mut self) -> Result<(), Self::Error> { self.command(USE_BUILTIN_LUT, &[]) }

    fn set_sleep_mode(
        &mut self,
        mode: SleepMode,
    ) -> Result<(), Self::Error> {
        let command = match mode {
            SleepMode::On => SLEEP_ON,
            SleepMode::Off => SLEEP_OFF,
        };
        self.command(command, &[])
    }

    fn set_display_mode(
        &mut self,
        mode: DisplayMode,
    ) -> Result<(), Self::Error> {
        let command = match mode {
            DisplayMode::AllOff => DISPLAY_ALL_OFF,
            DisplayMode::AllOn => DISPLAY_ALL_ON,
            DisplayMode::Normal => DISPLAY_NORMAL,
            DisplayMode::Inverse => DISPLAY_INVERSE,
        };
        self.command(command, &[])
    }

    fn clear_region(
        &mut self,
        region: Region,
    ) -> Result<(), Self::Error> {
        self.command(CLEAR_WINDOW, &[region.x0, region.y0, region.x1, region.y1])
    }

    fn draw_text(
        &mut self,
        font: &MonoFont<'_>,
        position: Point,
        foreground: Rgb565,
        background: Rgb565,
        text: &str,
    ) -> Result<(), Self::Error> {
        // Opaque background: every redraw overwrites the whole glyph cells
        let style = MonoTextStyleBuilder::new()
            .font(font)
            .text_color(foreground)
            .background_color(background)
            .build();
        Text::with_baseline(text, position, style, Baseline::Top).draw(self)?;
        Ok(())
    }
}

impl<B: ParallelBus> OriginDimensions for Ssd1339<B> {
    fn size(&self) -> Size { Size::new(WIDTH, HEIGHT) }
}

impl<B: ParallelBus> DrawTarget for Ssd1339<B> {
    type Color = Rgb565;
    type Error = B::Error;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if bounds.contains(point) {
                self.open_window(&Rectangle::new(point, Size::new(1, 1)))?;
                self.write_pixels(core::iter::once(color))?;
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(
        &mut self,
        area: &Rectangle,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.is_zero_sized() {
            return Ok(());
        }

        if drawable_area == *area {
            let pixel_count = (area.size.width * area.size.height) as usize;
            self.open_window(area)?;
            return self.write_pixels(colors.into_iter().take(pixel_count));
        }

        // Partly off-panel: only the visible pixels, one at a time
        let visible = area
            .points()
            .zip(colors)
            .filter(|(point, _)| drawable_area.contains(*point))
            .map(|(point, color)| Pixel(point, color));
        self.draw_iter(visible)
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.is_zero_sized() {
            return Ok(());
        }

        let pixel_count = (drawable_area.size.width * drawable_area.size.height) as usize;
        self.open_window(&drawable_area)?;
        self.write_pixels(core::iter::repeat_n(color, pixel_count))
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let panel = self.bounding_box();
        self.fill_solid(&panel, color)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
