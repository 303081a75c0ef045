//! # RustPttHid
//!
//! Microphone accessory buttons bridged to a HID button report.
//!
//! ## Architecture
//!
//! Once per ~10 ms tick the [`TickDriver`] samples two analog lines and
//! reports four button bits:
//! - Channel A → [`PttClassifier`]: latched PTT, delayed ON, instant OFF
//! - Channel B → [`UpDownClassifier`]: UP / DOWN / neutral by two thresholds
//! - [`ButtonReport`]: button 0 = PTT, 1 = reserved, 2 = UP, 3 = DOWN
//!
//! Classifiers are pure logic. Hardware sits behind the [`hal`] traits and
//! the [`Clock`] trait, so everything above them runs on the host.

#![cfg_attr(not(test), no_std)]

pub mod classify;
pub mod clock;
pub mod config;
pub mod driver;
pub mod fault;
pub mod hal;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod report;

pub use classify::{PttClassifier, PttPhase, UpDown, UpDownClassifier};
pub use clock::{Clock, ManualClock, Millis};
pub use config::Thresholds;
pub use driver::TickDriver;
pub use fault::{FaultCode, FaultState};
pub use hal::{ButtonReporter, Channel, ChannelReader, HalError};
pub use log_drain::LogDrain;
pub use log_globals::{FAULT_STATE, LOG_STREAM};
pub use report::{ButtonReport, HID_REPORT_DESCRIPTOR};
