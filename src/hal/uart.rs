//! Button report output over UART1.
//!
//! The ESP32-S3 talks to a USB HID bridge over a TX-only serial link.
//! Each report is a 2-byte frame `[REPORT_SYNC, bits]`; the bridge
//! forwards `bits` as the HID input report.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32-S3 GPIO17 (TX) ──────▶ bridge RX
//!                              └─▶ USB HID to host
//! ```

use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartTxDriver};
use esp_idf_svc::sys::EspError;

use super::{ButtonReporter, HalError};
use crate::config::REPORT_UART_BAUD;
use crate::report::ButtonReport;

/// Report sink on a TX-only UART.
pub struct SerialHidReporter<'d> {
    uart: UartTxDriver<'d>,
}

impl<'d> SerialHidReporter<'d> {
    /// Initialize UART1 TX-only on `tx_pin` at [`REPORT_UART_BAUD`].
    pub fn new(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    ) -> Result<Self, EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(REPORT_UART_BAUD));

        let uart = UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;

        Ok(Self { uart })
    }
}

impl ButtonReporter for SerialHidReporter<'_> {
    fn report(&mut self, report: ButtonReport) -> Result<(), HalError> {
        let frame = report.to_frame();
        match self.uart.write(&frame) {
            Ok(n) if n == frame.len() => Ok(()),
            _ => Err(HalError::ReportWrite),
        }
    }
}
