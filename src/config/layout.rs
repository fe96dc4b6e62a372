//! Display geometry and text placement.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Point;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (SSD1339 128x128).
pub const SCREEN_WIDTH: u32 = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 128;

/// Last addressable column.
pub const LAST_COLUMN: u8 = (SCREEN_WIDTH - 1) as u8;

/// Last addressable row.
pub const LAST_ROW: u8 = (SCREEN_HEIGHT - 1) as u8;

// =============================================================================
// Voltage Readout
// =============================================================================

/// Top-left corner of the voltage text.
pub const VOLTAGE_POSITION: Point = Point::new(20, 50);

/// Glyph set for the voltage text. Monospaced, so every redraw covers
/// exactly the same cells.
pub const VOLTAGE_FONT: &MonoFont<'static> = &profont::PROFONT_18_POINT;

/// Voltage text color.
pub const TEXT_COLOR: Rgb565 = Rgb565::WHITE;

/// Background painted behind every glyph.
pub const BACKGROUND_COLOR: Rgb565 = Rgb565::BLACK;

/// Capacity of the formatted voltage string ("3.30 V" plus headroom).
pub const VOLTAGE_TEXT_LEN: usize = 16;
