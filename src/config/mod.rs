//! Module: config
//!
//! Purpose: Compile-time configuration for RustPttHid.
//!
//! Architecture:
//! - All values are `const`; nothing is settable at runtime
//! - Thresholds are specified against a 10-bit ADC (0..=1023) and rescaled
//!   proportionally for other resolutions via [`Thresholds::for_resolution`]
//!
//! Safety: Safe. Constants only.

use crate::logging::LogLevel;

/// Bit depth the thresholds below are expressed in.
pub const REFERENCE_ADC_BITS: u8 = 10;

/// Bit depth of the ESP32-S3 oneshot ADC used on target.
pub const TARGET_ADC_BITS: u8 = 12;

/// Channel A: readings below this value mean the PTT line is pulled low (keyed).
pub const TH_PTT: u16 = 880;

/// Channel B: readings below this value are the GND-short band (UP).
pub const TH_LOW: u16 = 80;

/// Channel B: readings at or above this value are open circuit (neutral).
pub const TH_HIGH: u16 = 260;

/// Minimum continuous press before PTT latches.
///
/// Absorbs contact bounce at keying time, which otherwise shows up at the
/// far end as a DC-shift pop. Release is never delayed.
pub const ACTIVATION_DELAY_MS: u32 = 100;

/// Polling cadence of the main loop.
pub const TICK_PERIOD_MS: u32 = 10;

/// Baud rate of the serial link carrying button reports to the USB bridge.
pub const REPORT_UART_BAUD: u32 = 115_200;

/// First byte of every report frame on the serial link.
pub const REPORT_SYNC: u8 = 0xA5;

/// Messages above this level are not pushed to the log stream.
pub const LOG_LEVEL: LogLevel = LogLevel::Debug;

/// Interval between "dropped log messages" reports from the drain.
pub const LOG_DROP_REPORT_MS: u32 = 10_000;

/// Largest raw value an ADC of `bits` resolution can return.
pub const fn adc_max(bits: u8) -> u16 {
    assert!(bits >= 1 && bits <= 16, "ADC resolution must be 1..=16 bits");
    ((1u32 << bits) - 1) as u16
}

/// Rescale a 10-bit threshold to an ADC of `bits` resolution.
pub const fn rescale(value: u16, bits: u8) -> u16 {
    assert!(bits >= 1 && bits <= 16, "ADC resolution must be 1..=16 bits");
    let scaled = if bits >= REFERENCE_ADC_BITS {
        (value as u32) << (bits - REFERENCE_ADC_BITS)
    } else {
        (value as u32) >> (REFERENCE_ADC_BITS - bits)
    };
    scaled as u16
}

/// Threshold set shared by both classifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    /// Channel A press threshold.
    pub ptt: u16,
    /// Channel B UP/DOWN boundary.
    pub low: u16,
    /// Channel B DOWN/neutral boundary.
    pub high: u16,
    /// Largest raw reading at this resolution.
    pub adc_max: u16,
}

impl Thresholds {
    /// Thresholds at the reference 10-bit resolution.
    pub const DEFAULT: Self = Self::for_resolution(REFERENCE_ADC_BITS);

    /// Thresholds rescaled for an ADC of `bits` resolution.
    pub const fn for_resolution(bits: u8) -> Self {
        Self {
            ptt: rescale(TH_PTT, bits),
            low: rescale(TH_LOW, bits),
            high: rescale(TH_HIGH, bits),
            adc_max: adc_max(bits),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_resolution_is_identity() {
        let th = Thresholds::DEFAULT;
        assert_eq!(th.ptt, 880);
        assert_eq!(th.low, 80);
        assert_eq!(th.high, 260);
        assert_eq!(th.adc_max, 1023);
    }

    #[test]
    fn test_rescale_to_12_bits() {
        let th = Thresholds::for_resolution(12);
        assert_eq!(th.ptt, 3520);
        assert_eq!(th.low, 320);
        assert_eq!(th.high, 1040);
        assert_eq!(th.adc_max, 4095);
    }

    #[test]
    fn test_rescale_down_to_8_bits() {
        let th = Thresholds::for_resolution(8);
        assert_eq!(th.ptt, 220);
        assert_eq!(th.low, 20);
        assert_eq!(th.high, 65);
        assert_eq!(th.adc_max, 255);
    }

    #[test]
    fn test_band_ordering_holds() {
        for bits in 8..=16 {
            let th = Thresholds::for_resolution(bits);
            assert!(th.low < th.high, "bits={}", bits);
            assert!(th.high < th.ptt, "bits={}", bits);
            assert!(th.ptt <= th.adc_max, "bits={}", bits);
        }
    }
}
