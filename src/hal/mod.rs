//! Hardware Abstraction Layer for RustPttHid.
//!
//! The driver only sees the traits below. ESP-IDF implementations live in
//! the target-only submodules; tests and the host simulation bring their own.
//! Business logic stays in core modules, HAL is just I/O.

use crate::report::ButtonReport;

#[cfg(target_os = "espidf")]
pub mod adc;
#[cfg(target_os = "espidf")]
pub mod clock;
#[cfg(target_os = "espidf")]
pub mod uart;

#[cfg(target_os = "espidf")]
pub use adc::AdcChannelReader;
#[cfg(target_os = "espidf")]
pub use clock::EspClock;
#[cfg(target_os = "espidf")]
pub use uart::SerialHidReporter;

/// Analog input channel on the accessory connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Channel A, PTT line
    Ptt,
    /// Channel B, UP/DOWN ladder
    UpDown,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Ptt => "A/PTT",
            Channel::UpDown => "B/UPDOWN",
        }
    }
}

/// HAL error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// ADC conversion failed
    AdcRead,
    /// Report could not be written to the host link
    ReportWrite,
}

impl HalError {
    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::AdcRead => "ADC read failed",
            Self::ReportWrite => "report write failed",
        }
    }
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Source of raw analog samples.
pub trait ChannelReader {
    /// Sample one channel. Returns the raw reading in the ADC's native range.
    fn read(&mut self, channel: Channel) -> Result<u16, HalError>;
}

/// Sink for button reports.
pub trait ButtonReporter {
    /// Forward one report to the host. Called every tick.
    fn report(&mut self, report: ButtonReport) -> Result<(), HalError>;
}

impl<R: ChannelReader + ?Sized> ChannelReader for &mut R {
    #[inline]
    fn read(&mut self, channel: Channel) -> Result<u16, HalError> {
        (**self).read(channel)
    }
}

impl<P: ButtonReporter + ?Sized> ButtonReporter for &mut P {
    #[inline]
    fn report(&mut self, report: ButtonReport) -> Result<(), HalError> {
        (**self).report(report)
    }
}
