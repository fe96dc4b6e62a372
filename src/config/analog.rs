//! Analog front-end constants.

/// ADC conversion width in bits.
pub const RESOLUTION_BITS: u32 = 12;

/// Number of distinct conversion codes (4096 for 12 bits).
pub const FULL_SCALE: u32 = 1 << RESOLUTION_BITS;

/// Largest valid conversion result.
pub const MAX_READING: u16 = (FULL_SCALE - 1) as u16;

/// ADC reference voltage in millivolts.
pub const REFERENCE_MILLIVOLTS: u32 = 3300;

/// ADC reference voltage in centivolts (the display resolution).
pub const REFERENCE_CENTIVOLTS: u32 = REFERENCE_MILLIVOLTS / 10;
