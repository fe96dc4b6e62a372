//! Analog samples and their conversion to a voltage readout.
//!
//! A [`Sample`] is one 12-bit ADC conversion. A [`Voltage`] is the same
//! reading scaled by the reference voltage and kept as integer centivolts,
//! which is exactly the two-decimal precision shown on screen and avoids
//! float formatting on the target.
//!
//! Conversion: `centivolts = round(raw * 330 / 4096)`, with exact half
//! centivolt ties rounded down. That is what single-precision `raw * 3.3 / 4096`
//! printed with two decimals gives, since 3.3 is stored slightly below its
//! real value. Only codes 1024 and 3072 land on a tie.
//!
//! | Raw  | Text     |
//! |------|----------|
//! | 0    | `0.00 V` |
//! | 1024 | `0.82 V` |
//! | 2048 | `1.65 V` |
//! | 3072 | `2.47 V` |
//! | 4095 | `3.30 V` |

use core::fmt::{self, Write};

use heapless::String;

use crate::config::analog::{FULL_SCALE, MAX_READING, REFERENCE_CENTIVOLTS};
use crate::config::layout::VOLTAGE_TEXT_LEN;

/// One 12-bit conversion result in `[0, 4095]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Sample(u16);

impl Sample {
    /// Largest representable sample.
    pub const MAX: Self = Self(MAX_READING);

    /// Wrap a raw conversion result, saturating anything wider than 12 bits.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        if raw > MAX_READING { Self::MAX } else { Self(raw) }
    }

    /// Raw conversion code.
    #[inline]
    pub const fn raw(self) -> u16 { self.0 }

    /// Scale to a voltage using the configured reference.
    #[inline]
    pub const fn voltage(self) -> Voltage { Voltage::from_sample(self) }
}

/// A voltage reading with two decimal places of precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Voltage {
    centivolts: u16,
}

impl Voltage {
    /// Convert a sample to the nearest centivolt, ties rounded down.
    pub const fn from_sample(sample: Sample) -> Self {
        let scaled = sample.0 as u32 * REFERENCE_CENTIVOLTS + FULL_SCALE / 2 - 1;
        Self {
            centivolts: (scaled / FULL_SCALE) as u16,
        }
    }

    #[inline]
    pub const fn centivolts(self) -> u16 { self.centivolts }

    /// Render as fixed-point text with a unit suffix, e.g. `"1.65 V"`.
    pub fn to_text(self) -> String<VOLTAGE_TEXT_LEN> {
        let mut text = String::new();
        // Longest possible output is "655.35 V", well inside the capacity
        write!(text, "{}", self).ok();
        text
    }
}

impl fmt::Display for Voltage {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}.{:02} V", self.centivolts / 100, self.centivolts % 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
