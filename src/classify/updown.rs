//! UP/DOWN classifier
//!
//! Channel B carries three hardware states with wide separation:
//! short to ground, resistive pull-down, open. Two thresholds split the
//! range into half-open bands. Pure function of the current sample,
//! no hysteresis.

use crate::config::{TH_HIGH, TH_LOW};

/// Channel B band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpDown {
    /// `raw < low`: GND short, reported as button 2
    Up,
    /// `low <= raw < high`: pull-down, reported as button 3
    Down,
    /// `raw >= high`: open circuit
    Neutral,
}

impl UpDown {
    #[inline]
    pub fn up(self) -> bool {
        self == UpDown::Up
    }

    #[inline]
    pub fn down(self) -> bool {
        self == UpDown::Down
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UpDown::Up => "UP",
            UpDown::Down => "DOWN",
            UpDown::Neutral => "NEUTRAL",
        }
    }
}

/// UP/DOWN classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpDownClassifier {
    low: u16,
    high: u16,
}

impl UpDownClassifier {
    /// Create classifier with band boundaries `low < high`.
    pub const fn new(low: u16, high: u16) -> Self {
        assert!(low < high, "UP/DOWN thresholds must satisfy low < high");
        Self { low, high }
    }

    /// Band of a single raw reading.
    #[inline]
    pub fn classify(&self, raw: u16) -> UpDown {
        if raw < self.low {
            UpDown::Up
        } else if raw < self.high {
            UpDown::Down
        } else {
            UpDown::Neutral
        }
    }

    /// Classify one channel B sample as `(up, down)`.
    ///
    /// At most one of the two is ever true.
    #[inline]
    pub fn tick(&self, raw: u16) -> (bool, bool) {
        let band = self.classify(raw);
        (band.up(), band.down())
    }

    #[inline]
    pub fn low(&self) -> u16 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> u16 {
        self.high
    }
}

impl Default for UpDownClassifier {
    fn default() -> Self {
        Self::new(TH_LOW, TH_HIGH)
    }
}
