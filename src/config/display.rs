//! SSD1339 operating parameters.
//!
//! Applied once by the presentation task during bring-up. Values are tuned for
//! the 128x128 RGB OLED module; see the SSD1339 datasheet sections on contrast
//! current (`0xC1`) and precharge voltage (`0xBB`).

use crate::drivers::display::{ColorLevels, Region, RemapMode};

use super::layout::{LAST_COLUMN, LAST_ROW};

/// 65k colors with the odd/even COM split used by the module's panel wiring.
pub const REMAP_MODE: RemapMode = RemapMode::COLOR_65K.union(RemapMode::COM_ODD_EVEN);

/// Contrast current for color channels A, B, C.
pub const CONTRAST_CURRENT: ColorLevels = ColorLevels::new(1, 200, 200);

/// Precharge voltage for color channels A, B, C.
pub const PRECHARGE_VOLTAGE: ColorLevels = ColorLevels::new(2, 255, 255);

/// Whole addressable area of the controller.
pub const FULL_REGION: Region = Region::new(0, 0, LAST_COLUMN, LAST_ROW);
